use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{AttendeeListQuery, AttendeeProfile, AttendeeUpsert, CandidatePoolQuery};

/// Errors that can occur when reading or writing attendee profiles
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The record exists but is not in a state that allows the change
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Source of attendee profiles for the matcher and the attendee directory
///
/// The candidate pool is the store's responsibility: it must only return
/// attendees of the requested event scope and never the excluded attendee.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a single attendee, `StoreError::NotFound` when absent
    async fn fetch_profile(&self, id: &str) -> Result<AttendeeProfile, StoreError>;

    /// Fetch at most `query.cap` attendees sharing `query.event_scope`
    async fn fetch_candidate_pool(
        &self,
        query: &CandidatePoolQuery,
    ) -> Result<Vec<AttendeeProfile>, StoreError>;

    /// Fetch every attendee whose id is in `ids`; unknown ids are skipped
    async fn fetch_many(&self, ids: &[String]) -> Result<Vec<AttendeeProfile>, StoreError>;

    /// Most recently created attendees first
    async fn list_attendees(
        &self,
        query: &AttendeeListQuery,
    ) -> Result<Vec<AttendeeProfile>, StoreError>;

    /// Insert when `upsert.id` is `None`, otherwise update the given fields
    async fn upsert_attendee(&self, upsert: AttendeeUpsert) -> Result<AttendeeProfile, StoreError>;

    /// Look up an event by slug, creating it when missing
    async fn resolve_event_code(&self, slug: &str) -> Result<String, StoreError>;

    /// Look up an event by slug without creating it
    async fn find_event(&self, slug: &str) -> Result<Option<String>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> ProfileStore for Arc<S>
where
    S: ProfileStore + ?Sized,
{
    async fn fetch_profile(&self, id: &str) -> Result<AttendeeProfile, StoreError> {
        (**self).fetch_profile(id).await
    }

    async fn fetch_candidate_pool(
        &self,
        query: &CandidatePoolQuery,
    ) -> Result<Vec<AttendeeProfile>, StoreError> {
        (**self).fetch_candidate_pool(query).await
    }

    async fn fetch_many(&self, ids: &[String]) -> Result<Vec<AttendeeProfile>, StoreError> {
        (**self).fetch_many(ids).await
    }

    async fn list_attendees(
        &self,
        query: &AttendeeListQuery,
    ) -> Result<Vec<AttendeeProfile>, StoreError> {
        (**self).list_attendees(query).await
    }

    async fn upsert_attendee(&self, upsert: AttendeeUpsert) -> Result<AttendeeProfile, StoreError> {
        (**self).upsert_attendee(upsert).await
    }

    async fn resolve_event_code(&self, slug: &str) -> Result<String, StoreError> {
        (**self).resolve_event_code(slug).await
    }

    async fn find_event(&self, slug: &str) -> Result<Option<String>, StoreError> {
        (**self).find_event(slug).await
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        (**self).health_check().await
    }
}
