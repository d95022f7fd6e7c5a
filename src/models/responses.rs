use serde::{Deserialize, Serialize};
use crate::models::domain::{AttendeeProfile, EventMetrics, Intro, IntroStatus, Suggestion};

/// Suggestion enriched with the partner's display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionView {
    #[serde(rename = "partnerId")]
    pub partner_id: String,
    #[serde(rename = "partnerName", skip_serializing_if = "Option::is_none")]
    pub partner_name: Option<String>,
    pub score: f64,
    pub rationale: String,
}

impl SuggestionView {
    pub fn new(suggestion: Suggestion, partner_name: Option<String>) -> Self {
        Self {
            partner_id: suggestion.partner_id,
            partner_name,
            score: suggestion.score,
            rationale: suggestion.rationale,
        }
    }
}

/// Response for the match run endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMatchResponse {
    pub ok: bool,
    #[serde(rename = "attendeeId")]
    pub attendee_id: String,
    pub suggestions: Vec<SuggestionView>,
}

/// Single attendee response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendeeResponse {
    pub ok: bool,
    pub attendee: AttendeeProfile,
}

/// Attendee list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendeesResponse {
    pub ok: bool,
    pub attendees: Vec<AttendeeProfile>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Response for a newly proposed intro
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestIntroResponse {
    pub ok: bool,
    #[serde(rename = "introId")]
    pub intro_id: String,
    pub status: IntroStatus,
}

/// Response after an intro changed state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroStatusResponse {
    pub ok: bool,
    #[serde(rename = "introId")]
    pub intro_id: String,
    pub status: IntroStatus,
}

/// Public details of the other side of an intro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl PartnerSummary {
    /// Only the id, used when the partner profile could not be loaded
    pub fn bare(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            role: None,
            company: None,
        }
    }
}

impl From<&AttendeeProfile> for PartnerSummary {
    fn from(profile: &AttendeeProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            role: profile.role.clone(),
            company: profile.company.clone(),
        }
    }
}

/// One intro as listed for a participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroView {
    pub id: String,
    pub status: IntroStatus,
    pub partner: PartnerSummary,
}

impl IntroView {
    pub fn new(intro: &Intro, partner: PartnerSummary) -> Self {
        Self {
            id: intro.id.clone(),
            status: intro.status,
            partner,
        }
    }
}

/// Intros of one attendee, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyIntrosResponse {
    pub ok: bool,
    pub intros: Vec<IntroView>,
}

/// Admin dashboard counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub ok: bool,
    pub data: EventMetrics,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(status_code: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}
