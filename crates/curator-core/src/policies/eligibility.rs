//! Reviewer eligibility evaluator and re-application cooldown

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::{Role, UserAggregate};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Configurable requirements for joining the reviewer pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EligibilityThresholds {
    pub min_account_age_days: i64,
    pub min_submissions: i64,
    pub min_approved: i64,
    /// Fraction in `0.0..=1.0`
    pub min_approval_rate: f64,
    pub reapply_cooldown_days: i64,
}

impl Default for EligibilityThresholds {
    fn default() -> Self {
        Self {
            min_account_age_days: 30,
            min_submissions: 10,
            min_approved: 5,
            min_approval_rate: 0.7,
            reapply_cooldown_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    pub account_age_days: i64,
    pub submissions_count: i64,
    pub approved_count: i64,
    pub rejected_count: i64,
    pub approval_rate: f64,
    pub missing_requirements: Vec<String>,
}

/// `approved / (approved + rejected)`, or 0 when nothing has been decided
pub fn approval_rate(approved: i64, rejected: i64) -> f64 {
    let decided = approved + rejected;
    if decided <= 0 {
        0.0
    } else {
        approved as f64 / decided as f64
    }
}

/// What the user's reviewer applications say about applying again
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationStanding {
    pub has_pending: bool,
    /// Days left on the cooldown after the latest rejection
    pub days_until_reapply: Option<i64>,
}

impl ApplicationStanding {
    pub fn new(has_pending: bool, reapply: &ReapplyCheck) -> Self {
        Self {
            has_pending,
            days_until_reapply: reapply.days_until_reapply.filter(|_| !reapply.can_reapply),
        }
    }
}

/// Evaluate a user against the thresholds and their application history.
/// Users who already review are never eligible.
pub fn evaluate_eligibility(
    user: &UserAggregate,
    standing: &ApplicationStanding,
    thresholds: &EligibilityThresholds,
    now: DateTime<Utc>,
) -> EligibilityReport {
    let account_age_days = user.account_age_days(now);
    let rate = approval_rate(user.approved_count, user.rejected_count);
    let mut missing = Vec::new();

    if user.role != Role::User {
        missing.push(format!("already has the {} role", user.role));
    }
    if standing.has_pending {
        missing.push("a reviewer application is already pending".to_string());
    }
    if let Some(days) = standing.days_until_reapply {
        missing.push(format!(
            "reapply cooldown: {days} more day(s) after the last rejected application"
        ));
    }
    if account_age_days < thresholds.min_account_age_days {
        missing.push(format!(
            "account must be at least {} days old (currently {})",
            thresholds.min_account_age_days, account_age_days
        ));
    }
    if user.submissions_count < thresholds.min_submissions {
        missing.push(format!(
            "at least {} submissions required (currently {})",
            thresholds.min_submissions, user.submissions_count
        ));
    }
    if user.approved_count < thresholds.min_approved {
        missing.push(format!(
            "at least {} approved submissions required (currently {})",
            thresholds.min_approved, user.approved_count
        ));
    }
    // Only meaningful once something has been decided
    if user.decided_count() > 0 && rate < thresholds.min_approval_rate {
        missing.push(format!(
            "approval rate must be at least {:.0}% (currently {:.0}%)",
            thresholds.min_approval_rate * 100.0,
            rate * 100.0
        ));
    }

    EligibilityReport {
        eligible: missing.is_empty(),
        account_age_days,
        submissions_count: user.submissions_count,
        approved_count: user.approved_count,
        rejected_count: user.rejected_count,
        approval_rate: rate,
        missing_requirements: missing,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReapplyCheck {
    pub can_reapply: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_reapply: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_rejected_at: Option<DateTime<Utc>>,
}

/// Cooldown after the most recent rejected application.
///
/// While fewer than `cooldown_days` have elapsed since `last_rejected_at`,
/// re-application is blocked for `ceil(cooldown - elapsed)` more days.
/// A decision time in the future counts as zero elapsed.
pub fn can_reapply(
    last_rejected_at: Option<DateTime<Utc>>,
    cooldown_days: i64,
    now: DateTime<Utc>,
) -> ReapplyCheck {
    let Some(rejected_at) = last_rejected_at else {
        return ReapplyCheck {
            can_reapply: true,
            days_until_reapply: None,
            last_rejected_at: None,
        };
    };

    let elapsed_days = ((now - rejected_at).num_milliseconds().max(0) as f64 / 1000.0)
        / SECONDS_PER_DAY;
    let cooldown = cooldown_days as f64;

    if elapsed_days < cooldown {
        ReapplyCheck {
            can_reapply: false,
            days_until_reapply: Some((cooldown - elapsed_days).ceil() as i64),
            last_rejected_at: Some(rejected_at),
        }
    } else {
        ReapplyCheck {
            can_reapply: true,
            days_until_reapply: None,
            last_rejected_at: Some(rejected_at),
        }
    }
}
