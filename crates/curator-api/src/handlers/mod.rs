//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admin;
pub mod audit;
pub mod faqs;
pub mod health;
pub mod review;
pub mod reviewer;
pub mod submissions;
