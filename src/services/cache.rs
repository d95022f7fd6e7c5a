use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::models::{AttendeeListQuery, AttendeeProfile, AttendeeUpsert, CandidatePoolQuery};
use crate::services::store::{ProfileStore, StoreError};

/// Read-through cache in front of a profile store
///
/// Single profiles and candidate pools are kept in memory for `ttl_secs`.
/// Any upsert drops the affected profile and every cached pool, since the
/// changed attendee may belong to any of them. Directory listings always hit
/// the inner store.
pub struct CachedProfileStore<S> {
    inner: S,
    profiles: moka::future::Cache<String, AttendeeProfile>,
    pools: moka::future::Cache<String, Arc<Vec<AttendeeProfile>>>,
}

impl<S: ProfileStore> CachedProfileStore<S> {
    pub fn new(inner: S, capacity: u64, ttl_secs: u64) -> Self {
        let ttl = Duration::from_secs(ttl_secs);

        let profiles = moka::future::CacheBuilder::new(capacity)
            .time_to_live(ttl)
            .build();

        let pools = moka::future::CacheBuilder::new(capacity)
            .time_to_live(ttl)
            .build();

        Self { inner, profiles, pools }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            profile_entries: self.profiles.entry_count(),
            pool_entries: self.pools.entry_count(),
        }
    }

    async fn invalidate_profile(&self, id: &str) {
        self.profiles.invalidate(&CacheKey::profile(id)).await;
        self.pools.invalidate_all();
        tracing::trace!("Invalidated cache for attendee {}", id);
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub profile_entries: u64,
    pub pool_entries: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for an attendee profile
    pub fn profile(attendee_id: &str) -> String {
        format!("profile:{}", attendee_id)
    }

    /// Build a cache key for a candidate pool
    pub fn pool(query: &CandidatePoolQuery) -> String {
        format!(
            "pool:{}:{}:{}",
            query.event_scope.as_deref().unwrap_or("*"),
            query.exclude_id,
            query.cap
        )
    }
}

#[async_trait]
impl<S: ProfileStore> ProfileStore for CachedProfileStore<S> {
    async fn fetch_profile(&self, id: &str) -> Result<AttendeeProfile, StoreError> {
        let key = CacheKey::profile(id);
        if let Some(profile) = self.profiles.get(&key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(profile);
        }

        tracing::trace!("Cache miss: {}", key);
        let profile = self.inner.fetch_profile(id).await?;
        self.profiles.insert(key, profile.clone()).await;
        Ok(profile)
    }

    async fn fetch_candidate_pool(
        &self,
        query: &CandidatePoolQuery,
    ) -> Result<Vec<AttendeeProfile>, StoreError> {
        let key = CacheKey::pool(query);
        if let Some(pool) = self.pools.get(&key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(pool.as_ref().clone());
        }

        tracing::trace!("Cache miss: {}", key);
        let pool = self.inner.fetch_candidate_pool(query).await?;
        self.pools.insert(key, Arc::new(pool.clone())).await;
        Ok(pool)
    }

    async fn fetch_many(&self, ids: &[String]) -> Result<Vec<AttendeeProfile>, StoreError> {
        self.inner.fetch_many(ids).await
    }

    async fn list_attendees(
        &self,
        query: &AttendeeListQuery,
    ) -> Result<Vec<AttendeeProfile>, StoreError> {
        self.inner.list_attendees(query).await
    }

    async fn upsert_attendee(&self, upsert: AttendeeUpsert) -> Result<AttendeeProfile, StoreError> {
        let profile = self.inner.upsert_attendee(upsert).await?;
        self.invalidate_profile(&profile.id).await;
        Ok(profile)
    }

    async fn resolve_event_code(&self, slug: &str) -> Result<String, StoreError> {
        self.inner.resolve_event_code(slug).await
    }

    async fn find_event(&self, slug: &str) -> Result<Option<String>, StoreError> {
        self.inner.find_event(slug).await
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.inner.health_check().await
    }
}
