//! # curator-service
//!
//! Application layer containing the moderation use cases, services, and DTOs.

pub mod dto;
pub mod services;

#[cfg(test)]
mod test_support;

pub use dto::*;
pub use services::*;
