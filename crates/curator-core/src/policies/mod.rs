//! Pure moderation rules: batch grouping and reviewer eligibility

mod batching;
mod eligibility;

pub use batching::{group_submissions, group_submissions_within, ReviewItem, MERGE_WINDOW_MINUTES};
pub use eligibility::{
    approval_rate, can_reapply, evaluate_eligibility, ApplicationStanding, EligibilityReport,
    EligibilityThresholds, ReapplyCheck,
};
