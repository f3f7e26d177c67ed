//! Batch grouping engine
//!
//! Partitions the pending set into standalone items and multi-item batches.
//! Submissions from one submitter against one game are chained into a batch
//! while each is within the merge window of the previous one, so a long run of
//! edits stays together even when its ends are further apart than the window.
//! The result depends only on the set of submissions, never on input order.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use crate::entities::{Submission, TargetRef};
use crate::value_objects::Snowflake;

pub const MERGE_WINDOW_MINUTES: i64 = 10;

/// One entry of the review queue
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewItem {
    Single(Submission),
    Batch {
        batch_id: String,
        submitter_id: Snowflake,
        target: TargetRef,
        /// Sorted by submission time, then id
        submissions: Vec<Submission>,
    },
}

impl ReviewItem {
    pub fn submissions(&self) -> &[Submission] {
        match self {
            Self::Single(s) => std::slice::from_ref(s),
            Self::Batch { submissions, .. } => submissions,
        }
    }

    pub fn len(&self) -> usize {
        self.submissions().len()
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch { .. })
    }

    pub fn ids(&self) -> Vec<Snowflake> {
        self.submissions().iter().map(|s| s.id).collect()
    }

    /// Sort key of the earliest member
    fn earliest(&self) -> (DateTime<Utc>, Snowflake) {
        self.submissions()
            .iter()
            .map(|s| (s.submitted_at, s.id))
            .min()
            .unwrap_or((DateTime::<Utc>::MIN_UTC, Snowflake::new(0)))
    }
}

/// Group with the default ten minute merge window
pub fn group_submissions(submissions: &[Submission]) -> Vec<ReviewItem> {
    group_submissions_within(submissions, Duration::minutes(MERGE_WINDOW_MINUTES))
}

/// Group with an explicit merge window. The window is inclusive.
pub fn group_submissions_within(submissions: &[Submission], window: Duration) -> Vec<ReviewItem> {
    // Dedup by id; BTreeMap gives a stable iteration order.
    let mut unique: BTreeMap<Snowflake, &Submission> = BTreeMap::new();
    for submission in submissions {
        unique.entry(submission.id).or_insert(submission);
    }

    let mut items = Vec::with_capacity(unique.len());
    let mut buckets: BTreeMap<(Snowflake, Snowflake), Vec<&Submission>> = BTreeMap::new();

    for submission in unique.into_values() {
        match submission.target_id() {
            Some(target_id) if submission.is_pending() => buckets
                .entry((submission.submitter_id, target_id))
                .or_default()
                .push(submission),
            _ => items.push(ReviewItem::Single(submission.clone())),
        }
    }

    for mut bucket in buckets.into_values() {
        bucket.sort_by_key(|s| (s.submitted_at, s.id));

        let mut group: Vec<&Submission> = Vec::new();
        for submission in bucket {
            let joins = group
                .last()
                .is_some_and(|prev| submission.submitted_at - prev.submitted_at <= window);
            if !joins && !group.is_empty() {
                items.push(close_group(std::mem::take(&mut group)));
            }
            group.push(submission);
        }
        if !group.is_empty() {
            items.push(close_group(group));
        }
    }

    items.sort_by(|a, b| b.earliest().cmp(&a.earliest()));
    items
}

fn close_group(group: Vec<&Submission>) -> ReviewItem {
    let first = group[0];
    match (group.len(), first.target.as_ref()) {
        (2.., Some(target)) => ReviewItem::Batch {
            batch_id: format!("batch:{}:{}:{}", first.submitter_id, target.game_id, first.id),
            submitter_id: first.submitter_id,
            target: target.clone(),
            submissions: group.into_iter().cloned().collect(),
        },
        _ => ReviewItem::Single(first.clone()),
    }
}
