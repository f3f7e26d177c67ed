//! In-memory store
//!
//! Implements every repository trait over a single `RwLock`-guarded state.
//! Each trait method takes the lock once, so a decision's compare-and-set,
//! counter bump, effect and audit append are observed together or not at all.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use curator_core::entities::{
    ApplicationStatus, AuditLogEntry, CommitEffect, DecisionCommit, FaqEntry, Game,
    ReviewerApplication, Role, Submission, UserAggregate,
};
use curator_core::traits::{
    ApplicationRepository, AuditLogQuery, AuditLogRepository, AuditSort, FaqRepository,
    GameRepository, PendingFilter, RepoResult, SubmissionRepository, UserRepository,
};
use curator_core::value_objects::Snowflake;
use curator_core::DomainError;

#[derive(Debug, Default)]
struct State {
    users: HashMap<Snowflake, UserAggregate>,
    games: HashMap<Snowflake, Game>,
    submissions: HashMap<Snowflake, Submission>,
    /// Append-only, in commit order
    audit: Vec<AuditLogEntry>,
    applications: HashMap<Snowflake, ReviewerApplication>,
    faqs: Vec<FaqEntry>,
}

impl State {
    fn slug_taken(&self, slug: &str) -> bool {
        self.games.values().any(|g| g.slug == slug)
    }
}

/// Repository implementation backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user, counters included
    pub async fn seed_user(&self, user: UserAggregate) {
        self.state.write().await.users.insert(user.id, user);
    }

    /// Insert or replace a game
    pub async fn seed_game(&self, game: Game) {
        self.state.write().await.games.insert(game.id, game);
    }

    pub async fn audit_len(&self) -> usize {
        self.state.read().await.audit.len()
    }
}

#[async_trait]
impl SubmissionRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Submission>> {
        Ok(self.state.read().await.submissions.get(&id).cloned())
    }

    #[instrument(skip(self, submission), fields(submission_id = %submission.id))]
    async fn create(&self, submission: &Submission) -> RepoResult<()> {
        let mut state = self.state.write().await;
        if state.submissions.contains_key(&submission.id) {
            return Err(DomainError::ValidationError(format!(
                "submission {} already exists",
                submission.id
            )));
        }
        let user = state
            .users
            .get_mut(&submission.submitter_id)
            .ok_or(DomainError::UserNotFound(submission.submitter_id))?;
        user.submissions_count += 1;
        state.submissions.insert(submission.id, submission.clone());
        Ok(())
    }

    async fn list_pending(&self, filter: &PendingFilter) -> RepoResult<Vec<Submission>> {
        let state = self.state.read().await;
        let mut pending: Vec<Submission> = state
            .submissions
            .values()
            .filter(|s| s.is_pending())
            .filter(|s| filter.kind.is_none_or(|kind| s.kind() == kind))
            .filter(|s| filter.submitter_id.is_none_or(|id| s.submitter_id == id))
            .filter(|s| filter.target_id.is_none_or(|id| s.target_id() == Some(id)))
            .cloned()
            .collect();
        pending.sort_by_key(|s| (s.submitted_at, s.id));
        if let Some(limit) = filter.effective_limit() {
            pending.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(pending)
    }

    #[instrument(skip(self, commit), fields(submission_id = %commit.submission.id))]
    async fn set_decision(&self, commit: &DecisionCommit) -> RepoResult<Submission> {
        let mut state = self.state.write().await;
        let id = commit.submission.id;

        let stored = state
            .submissions
            .get(&id)
            .ok_or(DomainError::SubmissionNotFound(id))?;
        if !stored.is_pending() {
            debug!("decision lost compare-and-set");
            return Err(DomainError::AlreadyProcessed);
        }
        let submitter_id = stored.submitter_id;

        // Resolve the effect before mutating anything
        let mut audit = commit.audit.clone();
        let effect = match &commit.effect {
            CommitEffect::WriteGameFields { game_id, fields } => {
                let mut game = state
                    .games
                    .get(game_id)
                    .cloned()
                    .ok_or_else(|| DomainError::GameNotFound(game_id.to_string()))?;
                audit = commit.audit_against(&game);
                for (field, value) in fields {
                    game.set_field(field, value.clone());
                }
                Some(Effect::Game(game))
            }
            CommitEffect::CreateGame { game } => {
                let mut game = game.clone();
                if state.slug_taken(&game.slug) {
                    game.disambiguate_slug();
                    if state.slug_taken(&game.slug) {
                        return Err(DomainError::GameSlugExists(game.slug));
                    }
                }
                Some(Effect::Game(game))
            }
            CommitEffect::PublishFaq { entry } => Some(Effect::Faq(entry.clone())),
            CommitEffect::None => None,
        };

        if let Some(user) = state.users.get_mut(&submitter_id) {
            if commit.status().counts_as_approved() {
                user.approved_count += 1;
            } else {
                user.rejected_count += 1;
            }
        }
        match effect {
            Some(Effect::Game(game)) => {
                state.games.insert(game.id, game);
            }
            Some(Effect::Faq(entry)) => state.faqs.push(entry),
            None => {}
        }
        state.audit.push(audit);
        state.submissions.insert(id, commit.submission.clone());

        Ok(commit.submission.clone())
    }
}

enum Effect {
    Game(Game),
    Faq(FaqEntry),
}

#[async_trait]
impl GameRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Game>> {
        Ok(self.state.read().await.games.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Game>> {
        let state = self.state.read().await;
        Ok(state.games.values().find(|g| g.slug == slug).cloned())
    }

    async fn create(&self, game: &Game) -> RepoResult<()> {
        let mut state = self.state.write().await;
        if state.slug_taken(&game.slug) {
            return Err(DomainError::GameSlugExists(game.slug.clone()));
        }
        state.games.insert(game.id, game.clone());
        Ok(())
    }
}

#[async_trait]
impl FaqRepository for InMemoryStore {
    async fn list(&self, category: Option<&str>) -> RepoResult<Vec<FaqEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<FaqEntry> = state
            .faqs
            .iter()
            .filter(|e| category.is_none_or(|c| e.category.as_deref() == Some(c)))
            .cloned()
            .collect();
        entries.sort_by_key(|e| (e.created_at, e.id));
        Ok(entries)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<UserAggregate>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn create(&self, user: &UserAggregate) -> RepoResult<()> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&user.id) {
            return Err(DomainError::ValidationError(format!(
                "user {} already exists",
                user.id
            )));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn set_role(&self, id: Snowflake, role: Role) -> RepoResult<()> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        user.role = role;
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryStore {
    async fn list(&self, query: &AuditLogQuery) -> RepoResult<Vec<AuditLogEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<&AuditLogEntry> =
            state.audit.iter().filter(|e| query.matches(e)).collect();
        entries.sort_by_key(|e| (e.created_at, e.id));
        if query.sort == AuditSort::Newest {
            entries.reverse();
        }

        let offset = usize::try_from(query.offset.max(0)).unwrap_or(usize::MAX);
        let limit =
            usize::try_from(query.limit.clamp(1, AuditLogQuery::MAX_LIMIT)).unwrap_or(usize::MAX);
        Ok(entries
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_submission(
        &self,
        submission_id: Snowflake,
    ) -> RepoResult<Option<AuditLogEntry>> {
        let state = self.state.read().await;
        Ok(state
            .audit
            .iter()
            .find(|e| e.submission_id == submission_id)
            .cloned())
    }
}

impl State {
    fn applications_of(&self, user_id: Snowflake) -> Vec<&ReviewerApplication> {
        let mut apps: Vec<&ReviewerApplication> = self
            .applications
            .values()
            .filter(|a| a.user_id == user_id)
            .collect();
        apps.sort_by_key(|a| std::cmp::Reverse((a.created_at, a.id)));
        apps
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryStore {
    #[instrument(skip(self, application), fields(user_id = %application.user_id))]
    async fn create(&self, application: &ReviewerApplication) -> RepoResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&application.user_id) {
            return Err(DomainError::UserNotFound(application.user_id));
        }
        if state
            .applications
            .values()
            .any(|a| a.user_id == application.user_id && a.is_pending())
        {
            return Err(DomainError::PendingApplicationExists);
        }
        state
            .applications
            .insert(application.id, application.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ReviewerApplication>> {
        Ok(self.state.read().await.applications.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<ReviewerApplication>> {
        let state = self.state.read().await;
        Ok(state
            .applications_of(user_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn latest_by_user(&self, user_id: Snowflake) -> RepoResult<Option<ReviewerApplication>> {
        let state = self.state.read().await;
        Ok(state.applications_of(user_id).first().map(|a| (*a).clone()))
    }

    async fn latest_rejected(&self, user_id: Snowflake) -> RepoResult<Option<ReviewerApplication>> {
        let state = self.state.read().await;
        Ok(state
            .applications
            .values()
            .filter(|a| a.user_id == user_id && a.status == ApplicationStatus::Rejected)
            .max_by_key(|a| (a.decided_at, a.id))
            .cloned())
    }

    async fn has_pending(&self, user_id: Snowflake) -> RepoResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .applications
            .values()
            .any(|a| a.user_id == user_id && a.is_pending()))
    }

    async fn list_pending(&self, limit: i64) -> RepoResult<Vec<ReviewerApplication>> {
        let state = self.state.read().await;
        let mut pending: Vec<ReviewerApplication> = state
            .applications
            .values()
            .filter(|a| a.is_pending())
            .cloned()
            .collect();
        pending.sort_by_key(|a| (a.created_at, a.id));
        pending.truncate(usize::try_from(limit.clamp(1, 500)).unwrap_or(usize::MAX));
        Ok(pending)
    }

    #[instrument(skip(self, decided), fields(application_id = %decided.id))]
    async fn decide(&self, decided: &ReviewerApplication) -> RepoResult<ReviewerApplication> {
        let mut state = self.state.write().await;
        let stored = state
            .applications
            .get(&decided.id)
            .ok_or(DomainError::ApplicationNotFound(decided.id))?;
        if !stored.is_pending() {
            return Err(DomainError::ApplicationAlreadyDecided);
        }

        if decided.status == ApplicationStatus::Approved {
            if let Some(user) = state.users.get_mut(&decided.user_id) {
                if user.role == Role::User {
                    user.role = Role::Reviewer;
                }
            }
        }
        state.applications.insert(decided.id, decided.clone());
        Ok(decided.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use curator_core::entities::{
        Actor, ApplicationDecision, Decision, FaqProposal, FieldChange, GameProposal,
        SubmissionPayload, TargetRef,
    };
    use curator_core::value_objects::FieldValue;

    use super::*;

    fn now() -> chrono::DateTime<Utc> {
        Utc::now()
    }

    fn alice() -> Actor {
        Actor::new(Snowflake::new(10), "alice", Role::User)
    }

    fn bob() -> Actor {
        Actor::new(Snowflake::new(20), "bob", Role::Reviewer)
    }

    fn carol() -> Actor {
        Actor::new(Snowflake::new(30), "carol", Role::Reviewer)
    }

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        for actor in [alice(), bob(), carol()] {
            store
                .seed_user(UserAggregate::new(actor.id, actor.name, now()).with_role(actor.role))
                .await;
        }
        store
            .seed_game(
                Game::new(Snowflake::new(100), "Foo")
                    .with_field("developer", FieldValue::text("Acme")),
            )
            .await;
        store
    }

    fn correction(id: i64) -> Submission {
        let target = TargetRef {
            game_id: Snowflake::new(100),
            slug: "foo".to_string(),
        };
        let payload = SubmissionPayload::Correction(FieldChange {
            field: "developer".to_string(),
            old_value: FieldValue::text("Acme"),
            new_value: FieldValue::text("Acme Corp"),
        });
        Submission::new(Snowflake::new(id), &alice(), Some(target), payload, None).unwrap()
    }

    fn commit(submission: &Submission, reviewer: &Actor, decision: &Decision) -> DecisionCommit {
        DecisionCommit::prepare(
            submission,
            reviewer,
            decision,
            now(),
            Snowflake::new(submission.id.into_inner() + 1000),
            Snowflake::new(submission.id.into_inner() + 2000),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_bumps_submission_count() {
        let store = seeded().await;
        SubmissionRepository::create(&store, &correction(1))
            .await
            .unwrap();

        let user = UserRepository::find_by_id(&store, alice().id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.submissions_count, 1);
    }

    #[tokio::test]
    async fn test_create_requires_known_submitter() {
        let store = InMemoryStore::new();
        let err = SubmissionRepository::create(&store, &correction(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_approve_writes_field_counter_and_audit() {
        let store = seeded().await;
        let submission = correction(1);
        SubmissionRepository::create(&store, &submission)
            .await
            .unwrap();

        let decided = store
            .set_decision(&commit(&submission, &bob(), &Decision::approve()))
            .await
            .unwrap();
        assert!(!decided.is_pending());

        let game = GameRepository::find_by_id(&store, Snowflake::new(100))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(game.field_value("developer"), FieldValue::text("Acme Corp"));

        let user = UserRepository::find_by_id(&store, alice().id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.approved_count, 1);

        let audit = store
            .find_by_submission(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(audit.reviewer_id, bob().id);
        assert_eq!(audit.submitter_id, Some(alice().id));
    }

    #[tokio::test]
    async fn test_audit_old_value_reflects_earlier_commit() {
        let store = seeded().await;
        let first = correction(1);
        let mut second = correction(2);
        second.payload = SubmissionPayload::Correction(FieldChange {
            field: "developer".to_string(),
            old_value: FieldValue::text("Acme"),
            new_value: FieldValue::text("Initech"),
        });
        // Both proposals saw "Acme" at intake
        SubmissionRepository::create(&store, &first).await.unwrap();
        SubmissionRepository::create(&store, &second).await.unwrap();

        store
            .set_decision(&commit(&first, &bob(), &Decision::approve()))
            .await
            .unwrap();
        store
            .set_decision(&commit(&second, &carol(), &Decision::approve()))
            .await
            .unwrap();

        let audit = store.find_by_submission(second.id).await.unwrap().unwrap();
        assert_eq!(audit.old_value, Some(FieldValue::text("Acme Corp")));
        assert_eq!(audit.new_value, Some(FieldValue::text("Initech")));
    }

    #[tokio::test]
    async fn test_second_decision_is_already_processed() {
        let store = seeded().await;
        let submission = correction(1);
        SubmissionRepository::create(&store, &submission)
            .await
            .unwrap();

        store
            .set_decision(&commit(&submission, &bob(), &Decision::approve()))
            .await
            .unwrap();
        let err = store
            .set_decision(&commit(
                &submission,
                &carol(),
                &Decision::reject("no").unwrap(),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::AlreadyProcessed));
        assert_eq!(store.audit_len().await, 1);
        let user = UserRepository::find_by_id(&store, alice().id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!((user.approved_count, user.rejected_count), (1, 0));
    }

    #[tokio::test]
    async fn test_concurrent_decisions_commit_once() {
        let store = Arc::new(seeded().await);
        let submission = correction(1);
        SubmissionRepository::create(store.as_ref(), &submission)
            .await
            .unwrap();

        let first = commit(&submission, &bob(), &Decision::approve());
        let second = commit(&submission, &carol(), &Decision::reject("dup").unwrap());

        let (a, b) = tokio::join!(
            {
                let store = Arc::clone(&store);
                async move { store.set_decision(&first).await }
            },
            {
                let store = Arc::clone(&store);
                async move { store.set_decision(&second).await }
            }
        );

        assert_eq!(usize::from(a.is_ok()) + usize::from(b.is_ok()), 1);
        assert_eq!(store.audit_len().await, 1);
    }

    #[tokio::test]
    async fn test_missing_game_rolls_back() {
        let store = InMemoryStore::new();
        store
            .seed_user(UserAggregate::new(alice().id, "alice", now()))
            .await;
        let submission = correction(1);
        SubmissionRepository::create(&store, &submission)
            .await
            .unwrap();

        let err = store
            .set_decision(&commit(&submission, &bob(), &Decision::approve()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::GameNotFound(_)));

        let stored = SubmissionRepository::find_by_id(&store, submission.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_pending());
        assert_eq!(store.audit_len().await, 0);
    }

    #[tokio::test]
    async fn test_new_game_slug_is_disambiguated() {
        let store = seeded().await;
        let payload = SubmissionPayload::Game(GameProposal {
            title: "Foo".to_string(),
            changes: vec![],
        });
        let submission = Submission::new(Snowflake::new(5), &alice(), None, payload, None).unwrap();
        SubmissionRepository::create(&store, &submission)
            .await
            .unwrap();

        store
            .set_decision(&commit(&submission, &bob(), &Decision::approve()))
            .await
            .unwrap();

        let created = GameRepository::find_by_slug(&store, "foo-2005")
            .await
            .unwrap();
        assert!(created.is_some());
    }

    #[tokio::test]
    async fn test_faq_published_on_approval() {
        let store = seeded().await;
        let payload = SubmissionPayload::Faq(FaqProposal {
            question: "Is it co-op?".to_string(),
            answer: "Yes, two players.".to_string(),
            category: Some("gameplay".to_string()),
        });
        let submission = Submission::new(Snowflake::new(7), &alice(), None, payload, None).unwrap();
        SubmissionRepository::create(&store, &submission)
            .await
            .unwrap();
        store
            .set_decision(&commit(&submission, &bob(), &Decision::approve()))
            .await
            .unwrap();

        assert_eq!(
            FaqRepository::list(&store, Some("gameplay"))
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(FaqRepository::list(&store, Some("other"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_list_pending_filters_and_orders() {
        let store = seeded().await;
        let base = now();
        for (id, offset) in [(1, 3), (2, 1), (3, 2)] {
            let submission = correction(id).with_submitted_at(base - Duration::minutes(offset));
            SubmissionRepository::create(&store, &submission)
                .await
                .unwrap();
        }

        let all = SubmissionRepository::list_pending(&store, &PendingFilter::default())
            .await
            .unwrap();
        let ids: Vec<i64> = all.iter().map(|s| s.id.into_inner()).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        let limited = SubmissionRepository::list_pending(
            &store,
            &PendingFilter {
                limit: Some(1),
                ..PendingFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(limited.len(), 1);

        let other_target = SubmissionRepository::list_pending(
            &store,
            &PendingFilter {
                target_id: Some(Snowflake::new(999)),
                ..PendingFilter::default()
            },
        )
        .await
        .unwrap();
        assert!(other_target.is_empty());
    }

    #[tokio::test]
    async fn test_audit_sort_and_paging() {
        let store = seeded().await;
        for id in 1..=3 {
            let submission = correction(id);
            SubmissionRepository::create(&store, &submission)
                .await
                .unwrap();
            let mut c = commit(&submission, &bob(), &Decision::approve());
            c.audit.created_at = now() + Duration::seconds(id);
            store.set_decision(&c).await.unwrap();
        }

        let newest = AuditLogRepository::list(&store, &AuditLogQuery::default())
            .await
            .unwrap();
        assert_eq!(newest[0].submission_id, Snowflake::new(3));

        let page = AuditLogRepository::list(
            &store,
            &AuditLogQuery {
                sort: AuditSort::Oldest,
                limit: 1,
                offset: 1,
                ..AuditLogQuery::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].submission_id, Snowflake::new(2));
    }

    #[tokio::test]
    async fn test_single_pending_application() {
        let store = seeded().await;
        let first = ReviewerApplication::new(
            Snowflake::new(50),
            alice().id,
            "I know the catalogue well".to_string(),
            "Years of wiki editing".to_string(),
        )
        .unwrap();
        let second = ReviewerApplication::new(
            Snowflake::new(51),
            alice().id,
            "Second attempt at applying".to_string(),
            "Years of wiki editing".to_string(),
        )
        .unwrap();

        ApplicationRepository::create(&store, &first).await.unwrap();
        let err = ApplicationRepository::create(&store, &second)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PendingApplicationExists));
    }

    #[tokio::test]
    async fn test_approving_application_promotes_user() {
        let store = seeded().await;
        let mut application = ReviewerApplication::new(
            Snowflake::new(50),
            alice().id,
            "I know the catalogue well".to_string(),
            "Years of wiki editing".to_string(),
        )
        .unwrap();
        ApplicationRepository::create(&store, &application)
            .await
            .unwrap();

        let decision = ApplicationDecision::new(ApplicationStatus::Approved, None).unwrap();
        application
            .apply_decision(Snowflake::new(1), &decision, now())
            .unwrap();
        store.decide(&application).await.unwrap();

        let user = UserRepository::find_by_id(&store, alice().id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, Role::Reviewer);
        assert!(matches!(
            store.decide(&application).await,
            Err(DomainError::ApplicationAlreadyDecided)
        ));
    }
}
