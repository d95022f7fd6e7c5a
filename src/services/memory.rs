use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{
    AttendeeListQuery, AttendeeProfile, AttendeeUpsert, CandidatePoolQuery, EventMetrics, Intro,
    IntroAction, IntroStatus, Suggestion,
};
use crate::services::intros::{transition_conflict, IntroStore};
use crate::services::store::{ProfileStore, StoreError};

#[derive(Debug, Default)]
struct MemoryState {
    /// Insertion order doubles as creation order
    attendees: Vec<AttendeeProfile>,
    /// slug -> event id
    events: HashMap<String, String>,
    intros: Vec<Intro>,
    /// (attendee id, suggestion) for every suggestion ever returned
    matches: Vec<(String, Suggestion)>,
}

/// Process-local profile and intro store
///
/// Used for local development (`store.backend = "memory"`) and tests.
/// Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    state: RwLock<MemoryState>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing profiles
    pub fn with_attendees(attendees: Vec<AttendeeProfile>) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                attendees,
                ..Default::default()
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.attendees.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn apply_upsert(profile: &mut AttendeeProfile, upsert: AttendeeUpsert) {
    if let Some(name) = upsert.name {
        profile.name = Some(name);
    }
    if let Some(role) = upsert.role {
        profile.role = Some(role);
    }
    if let Some(company) = upsert.company {
        profile.company = Some(company);
    }
    if let Some(bio) = upsert.bio {
        profile.bio = Some(bio);
    }
    if let Some(interests) = upsert.interests {
        profile.interests = interests;
    }
    if let Some(goals) = upsert.goals {
        profile.goals = goals;
    }
    if let Some(availability) = upsert.availability {
        profile.availability = Some(availability);
    }
    if let Some(email) = upsert.email {
        profile.email = Some(email);
    }
    if let Some(consent) = upsert.consent_intro {
        profile.consent_intro = Some(consent);
    }
    if let Some(event_id) = upsert.event_id {
        profile.event_id = Some(event_id);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn fetch_profile(&self, id: &str) -> Result<AttendeeProfile, StoreError> {
        let state = self.state.read().await;
        state
            .attendees
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Attendee {} not found", id)))
    }

    async fn fetch_candidate_pool(
        &self,
        query: &CandidatePoolQuery,
    ) -> Result<Vec<AttendeeProfile>, StoreError> {
        let state = self.state.read().await;
        let pool: Vec<AttendeeProfile> = state
            .attendees
            .iter()
            .filter(|a| a.id != query.exclude_id)
            .filter(|a| match &query.event_scope {
                Some(scope) => a.event_id.as_ref() == Some(scope),
                None => true,
            })
            .take(query.cap)
            .cloned()
            .collect();

        tracing::debug!("In-memory pool for {}: {} candidates", query.exclude_id, pool.len());

        Ok(pool)
    }

    async fn fetch_many(&self, ids: &[String]) -> Result<Vec<AttendeeProfile>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .attendees
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn list_attendees(
        &self,
        query: &AttendeeListQuery,
    ) -> Result<Vec<AttendeeProfile>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .attendees
            .iter()
            .rev()
            .filter(|a| match &query.event_id {
                Some(event_id) => a.event_id.as_ref() == Some(event_id),
                None => true,
            })
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn upsert_attendee(&self, upsert: AttendeeUpsert) -> Result<AttendeeProfile, StoreError> {
        let mut state = self.state.write().await;

        match upsert.id.clone() {
            Some(id) => {
                let profile = state
                    .attendees
                    .iter_mut()
                    .find(|a| a.id == id)
                    .ok_or_else(|| StoreError::NotFound(format!("Attendee {} not found", id)))?;
                apply_upsert(profile, upsert);
                Ok(profile.clone())
            }
            None => {
                let mut profile = AttendeeProfile {
                    id: uuid::Uuid::new_v4().to_string(),
                    created_at: Some(chrono::Utc::now()),
                    ..Default::default()
                };
                apply_upsert(&mut profile, upsert);
                state.attendees.push(profile.clone());
                Ok(profile)
            }
        }
    }

    async fn resolve_event_code(&self, slug: &str) -> Result<String, StoreError> {
        if slug.trim().is_empty() {
            return Err(StoreError::InvalidInput("Event code must not be empty".into()));
        }

        let mut state = self.state.write().await;
        let id = state
            .events
            .entry(slug.to_string())
            .or_insert_with(|| uuid::Uuid::new_v4().to_string())
            .clone();
        Ok(id)
    }

    async fn find_event(&self, slug: &str) -> Result<Option<String>, StoreError> {
        let state = self.state.read().await;
        Ok(state.events.get(slug).cloned())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[async_trait]
impl IntroStore for InMemoryProfileStore {
    async fn create_intro(&self, requester_id: &str, partner_id: &str) -> Result<Intro, StoreError> {
        let intro = Intro {
            id: uuid::Uuid::new_v4().to_string(),
            requester_id: requester_id.to_string(),
            partner_id: partner_id.to_string(),
            status: IntroStatus::Proposed,
            created_at: Some(chrono::Utc::now()),
        };

        self.state.write().await.intros.push(intro.clone());
        Ok(intro)
    }

    async fn fetch_intro(&self, id: &str) -> Result<Intro, StoreError> {
        let state = self.state.read().await;
        state
            .intros
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Intro {} not found", id)))
    }

    async fn transition_intro(&self, id: &str, action: IntroAction) -> Result<Intro, StoreError> {
        let mut state = self.state.write().await;
        let intro = state
            .intros
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Intro {} not found", id)))?;

        let next = match intro.status.apply(action) {
            Some(next) => next,
            None => return Err(transition_conflict(intro, action)),
        };
        intro.status = next;

        Ok(intro.clone())
    }

    async fn intros_for(&self, attendee_id: &str) -> Result<Vec<Intro>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .intros
            .iter()
            .rev()
            .filter(|i| i.involves(attendee_id))
            .cloned()
            .collect())
    }

    async fn record_matches(
        &self,
        attendee_id: &str,
        suggestions: &[Suggestion],
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state
            .matches
            .extend(suggestions.iter().map(|s| (attendee_id.to_string(), s.clone())));
        Ok(())
    }

    async fn metrics(&self) -> Result<EventMetrics, StoreError> {
        let state = self.state.read().await;
        let count = |wanted: &[IntroStatus]| {
            state.intros.iter().filter(|i| wanted.contains(&i.status)).count() as u64
        };

        Ok(EventMetrics::from_counts(
            state.attendees.len() as u64,
            state.matches.len() as u64,
            state.intros.len() as u64,
            count(&[IntroStatus::Accepted, IntroStatus::Met]),
            count(&[IntroStatus::Met]),
        ))
    }
}
