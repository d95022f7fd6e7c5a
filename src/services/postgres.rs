use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::models::{
    AttendeeListQuery, AttendeeProfile, AttendeeUpsert, CandidatePoolQuery, EventMetrics, Intro,
    IntroAction, IntroStatus, Suggestion,
};
use crate::services::intros::{transition_conflict, IntroStore};
use crate::services::store::{ProfileStore, StoreError};

/// Columns selected for every attendee read, ids cast to text
const ATTENDEE_COLUMNS: &str = r#"
    id::text AS id, name, role, company, bio, interests, goals, availability,
    event_id::text AS event_id, email, consent_intro, created_at
"#;

/// Columns selected for every intro read
const INTRO_COLUMNS: &str = r#"
    id::text AS id, a_id::text AS a_id, b_id::text AS b_id, status, created_at
"#;

/// PostgreSQL-backed profile store
///
/// Reads the `attendees`, `events`, `intros` and `matches` tables of the
/// hosted database. Schema management lives outside this service.
#[derive(Clone)]
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_profile(row: &PgRow) -> Result<AttendeeProfile, sqlx::Error> {
    let interests: Option<Vec<String>> = row.try_get("interests")?;
    let goals: Option<Vec<String>> = row.try_get("goals")?;

    Ok(AttendeeProfile {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        role: row.try_get("role")?,
        company: row.try_get("company")?,
        bio: row.try_get("bio")?,
        interests: interests.unwrap_or_default(),
        goals: goals.unwrap_or_default(),
        availability: row.try_get("availability")?,
        event_id: row.try_get("event_id")?,
        email: row.try_get("email")?,
        consent_intro: row.try_get("consent_intro")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_intro(row: &PgRow) -> Result<Intro, StoreError> {
    let status: String = row.try_get("status")?;

    Ok(Intro {
        id: row.try_get("id")?,
        requester_id: row.try_get("a_id")?,
        partner_id: row.try_get("b_id")?,
        status: status.parse::<IntroStatus>().map_err(StoreError::InvalidInput)?,
        created_at: row.try_get("created_at")?,
    })
}

fn rows_to_profiles(rows: &[PgRow]) -> Result<Vec<AttendeeProfile>, StoreError> {
    rows.iter()
        .map(|row| row_to_profile(row).map_err(StoreError::from))
        .collect()
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn fetch_profile(&self, id: &str) -> Result<AttendeeProfile, StoreError> {
        let query = format!("SELECT {} FROM attendees WHERE id::text = $1", ATTENDEE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Attendee {} not found", id)))?;

        Ok(row_to_profile(&row)?)
    }

    async fn fetch_candidate_pool(
        &self,
        query: &CandidatePoolQuery,
    ) -> Result<Vec<AttendeeProfile>, StoreError> {
        let rows = match &query.event_scope {
            Some(scope) => {
                let sql = format!(
                    r#"
                    SELECT {}
                    FROM attendees
                    WHERE id::text <> $1 AND event_id::text = $2
                    ORDER BY created_at ASC
                    LIMIT $3
                    "#,
                    ATTENDEE_COLUMNS
                );
                sqlx::query(&sql)
                    .bind(&query.exclude_id)
                    .bind(scope)
                    .bind(query.cap as i64)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    r#"
                    SELECT {}
                    FROM attendees
                    WHERE id::text <> $1
                    ORDER BY created_at ASC
                    LIMIT $2
                    "#,
                    ATTENDEE_COLUMNS
                );
                sqlx::query(&sql)
                    .bind(&query.exclude_id)
                    .bind(query.cap as i64)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        tracing::debug!(
            "Fetched {} candidates for {} (scope: {:?}, cap: {})",
            rows.len(),
            query.exclude_id,
            query.event_scope,
            query.cap
        );

        rows_to_profiles(&rows)
    }

    async fn fetch_many(&self, ids: &[String]) -> Result<Vec<AttendeeProfile>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {} FROM attendees WHERE id::text = ANY($1)", ATTENDEE_COLUMNS);
        let rows = sqlx::query(&query)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        rows_to_profiles(&rows)
    }

    async fn list_attendees(
        &self,
        query: &AttendeeListQuery,
    ) -> Result<Vec<AttendeeProfile>, StoreError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM attendees
            WHERE ($1::text IS NULL OR event_id::text = $1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
            ATTENDEE_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(query.event_id.as_deref())
            .bind(query.limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows_to_profiles(&rows)
    }

    /// Uses COALESCE so that fields left as `None` keep their stored value
    async fn upsert_attendee(&self, upsert: AttendeeUpsert) -> Result<AttendeeProfile, StoreError> {
        let row = match &upsert.id {
            Some(id) => {
                let sql = format!(
                    r#"
                    UPDATE attendees SET
                        name = COALESCE($2, name),
                        role = COALESCE($3, role),
                        company = COALESCE($4, company),
                        bio = COALESCE($5, bio),
                        interests = COALESCE($6, interests),
                        goals = COALESCE($7, goals),
                        availability = COALESCE($8, availability),
                        email = COALESCE($9, email),
                        consent_intro = COALESCE($10, consent_intro),
                        event_id = COALESCE($11::uuid, event_id)
                    WHERE id::text = $1
                    RETURNING {}
                    "#,
                    ATTENDEE_COLUMNS
                );
                sqlx::query(&sql)
                    .bind(id)
                    .bind(&upsert.name)
                    .bind(&upsert.role)
                    .bind(&upsert.company)
                    .bind(&upsert.bio)
                    .bind(&upsert.interests)
                    .bind(&upsert.goals)
                    .bind(&upsert.availability)
                    .bind(&upsert.email)
                    .bind(upsert.consent_intro)
                    .bind(&upsert.event_id)
                    .fetch_optional(&self.pool)
                    .await?
                    .ok_or_else(|| StoreError::NotFound(format!("Attendee {} not found", id)))?
            }
            None => {
                let sql = format!(
                    r#"
                    INSERT INTO attendees
                        (name, role, company, bio, interests, goals, availability, email, consent_intro, event_id)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10::uuid)
                    RETURNING {}
                    "#,
                    ATTENDEE_COLUMNS
                );
                sqlx::query(&sql)
                    .bind(&upsert.name)
                    .bind(&upsert.role)
                    .bind(&upsert.company)
                    .bind(&upsert.bio)
                    .bind(&upsert.interests)
                    .bind(&upsert.goals)
                    .bind(&upsert.availability)
                    .bind(&upsert.email)
                    .bind(upsert.consent_intro)
                    .bind(&upsert.event_id)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        let profile = row_to_profile(&row)?;
        tracing::debug!("Upserted attendee {}", profile.id);
        Ok(profile)
    }

    async fn resolve_event_code(&self, slug: &str) -> Result<String, StoreError> {
        if slug.trim().is_empty() {
            return Err(StoreError::InvalidInput("Event code must not be empty".into()));
        }

        if let Some(id) = self.find_event(slug).await? {
            return Ok(id);
        }

        // Concurrent first registrations for the same slug converge on one row
        let query = r#"
            INSERT INTO events (slug, name)
            VALUES ($1, $1)
            ON CONFLICT (slug)
            DO UPDATE SET slug = EXCLUDED.slug
            RETURNING id::text AS id
        "#;

        let row = sqlx::query(query).bind(slug).fetch_one(&self.pool).await?;
        let id: String = row.try_get("id")?;

        tracing::info!("Created event {} for code {}", id, slug);

        Ok(id)
    }

    async fn find_event(&self, slug: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT id::text AS id FROM events WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("id")?)),
            None => Ok(None),
        }
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl IntroStore for PostgresProfileStore {
    async fn create_intro(&self, requester_id: &str, partner_id: &str) -> Result<Intro, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO intros (a_id, b_id, status)
            VALUES ($1::uuid, $2::uuid, $3)
            RETURNING {}
            "#,
            INTRO_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(requester_id)
            .bind(partner_id)
            .bind(IntroStatus::Proposed.as_str())
            .fetch_one(&self.pool)
            .await?;

        row_to_intro(&row)
    }

    async fn fetch_intro(&self, id: &str) -> Result<Intro, StoreError> {
        let sql = format!("SELECT {} FROM intros WHERE id::text = $1", INTRO_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Intro {} not found", id)))?;

        row_to_intro(&row)
    }

    /// Compare-and-set on the status so concurrent actions cannot skip a state
    async fn transition_intro(&self, id: &str, action: IntroAction) -> Result<Intro, StoreError> {
        let intro = self.fetch_intro(id).await?;
        let next = match intro.status.apply(action) {
            Some(next) => next,
            None => return Err(transition_conflict(&intro, action)),
        };

        if next == intro.status {
            return Ok(intro);
        }

        let sql = format!(
            r#"
            UPDATE intros SET status = $2
            WHERE id::text = $1 AND status = $3
            RETURNING {}
            "#,
            INTRO_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(next.as_str())
            .bind(intro.status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::Conflict(format!("Intro {} changed concurrently", id)))?;

        row_to_intro(&row)
    }

    async fn intros_for(&self, attendee_id: &str) -> Result<Vec<Intro>, StoreError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM intros
            WHERE a_id::text = $1 OR b_id::text = $1
            ORDER BY created_at DESC
            "#,
            INTRO_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(attendee_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_intro).collect()
    }

    async fn record_matches(
        &self,
        attendee_id: &str,
        suggestions: &[Suggestion],
    ) -> Result<(), StoreError> {
        if suggestions.is_empty() {
            return Ok(());
        }

        let partners: Vec<String> = suggestions.iter().map(|s| s.partner_id.clone()).collect();
        let scores: Vec<f64> = suggestions.iter().map(|s| s.score).collect();
        let rationales: Vec<String> = suggestions.iter().map(|s| s.rationale.clone()).collect();

        sqlx::query(
            r#"
            INSERT INTO matches (attendee_id, partner_id, score, rationale)
            SELECT $1::uuid, partner::uuid, score, rationale
            FROM UNNEST($2::text[], $3::float8[], $4::text[]) AS t(partner, score, rationale)
            "#,
        )
        .bind(attendee_id)
        .bind(partners)
        .bind(scores)
        .bind(rationales)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn metrics(&self) -> Result<EventMetrics, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM attendees) AS signups,
                (SELECT COUNT(*) FROM matches) AS matches_proposed,
                (SELECT COUNT(*) FROM intros) AS intros_total,
                (SELECT COUNT(*) FROM intros WHERE status IN ('accepted', 'met')) AS intros_accepted,
                (SELECT COUNT(*) FROM intros WHERE status = 'met') AS meetings_confirmed
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let count = |column: &str| -> Result<u64, StoreError> {
            let value: i64 = row.try_get(column)?;
            Ok(value.max(0) as u64)
        };

        Ok(EventMetrics::from_counts(
            count("signups")?,
            count("matches_proposed")?,
            count("intros_total")?,
            count("intros_accepted")?,
            count("meetings_confirmed")?,
        ))
    }
}
