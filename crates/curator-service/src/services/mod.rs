//! Business logic services
//!
//! Each service borrows the [`ServiceContext`] and orchestrates domain rules,
//! repository calls and notifications for one area of the workflow.

pub mod application;
pub mod audit;
pub mod context;
pub mod error;
pub mod faq;
pub mod review;
pub mod submission;
pub mod user;

pub use application::ApplicationService;
pub use audit::AuditService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use faq::FaqService;
pub use review::ReviewService;
pub use submission::SubmissionService;
pub use user::UserService;
