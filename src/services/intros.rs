use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{EventMetrics, Intro, IntroAction, Suggestion};
use crate::services::store::StoreError;

/// Introductions between attendees, plus the match log behind the dashboard
///
/// Participant checks are the caller's job; the store only guards the
/// status transitions.
#[async_trait]
pub trait IntroStore: Send + Sync {
    /// Create a `proposed` intro from `requester_id` to `partner_id`
    async fn create_intro(&self, requester_id: &str, partner_id: &str) -> Result<Intro, StoreError>;

    /// Fetch one intro, `StoreError::NotFound` when absent
    async fn fetch_intro(&self, id: &str) -> Result<Intro, StoreError>;

    /// Apply `action`, `StoreError::Conflict` when the current status does not allow it
    async fn transition_intro(&self, id: &str, action: IntroAction) -> Result<Intro, StoreError>;

    /// Intros where the attendee is either side, newest first
    async fn intros_for(&self, attendee_id: &str) -> Result<Vec<Intro>, StoreError>;

    /// Persist the suggestions returned by a match run
    async fn record_matches(
        &self,
        attendee_id: &str,
        suggestions: &[Suggestion],
    ) -> Result<(), StoreError>;

    async fn metrics(&self) -> Result<EventMetrics, StoreError>;
}

#[async_trait]
impl<S> IntroStore for Arc<S>
where
    S: IntroStore + ?Sized,
{
    async fn create_intro(&self, requester_id: &str, partner_id: &str) -> Result<Intro, StoreError> {
        (**self).create_intro(requester_id, partner_id).await
    }

    async fn fetch_intro(&self, id: &str) -> Result<Intro, StoreError> {
        (**self).fetch_intro(id).await
    }

    async fn transition_intro(&self, id: &str, action: IntroAction) -> Result<Intro, StoreError> {
        (**self).transition_intro(id, action).await
    }

    async fn intros_for(&self, attendee_id: &str) -> Result<Vec<Intro>, StoreError> {
        (**self).intros_for(attendee_id).await
    }

    async fn record_matches(
        &self,
        attendee_id: &str,
        suggestions: &[Suggestion],
    ) -> Result<(), StoreError> {
        (**self).record_matches(attendee_id, suggestions).await
    }

    async fn metrics(&self) -> Result<EventMetrics, StoreError> {
        (**self).metrics().await
    }
}

/// Error for an action the intro's current status does not allow
pub(crate) fn transition_conflict(intro: &Intro, action: IntroAction) -> StoreError {
    StoreError::Conflict(format!(
        "Intro {} is {} and cannot become {}",
        intro.id,
        intro.status,
        action.target()
    ))
}
