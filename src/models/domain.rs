use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Attendee profile as stored by the profile store and read by the matcher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendeeProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub interests: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub goals: Vec<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(rename = "eventId", alias = "event_id", default)]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "consentIntro", alias = "consent_intro", default)]
    pub consent_intro: Option<bool>,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AttendeeProfile {
    /// Display name, falling back to the id when the attendee never gave one
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }
}

/// Accepts `null`, a list of strings, or anything else (treated as empty).
/// Non-string list entries are skipped.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Ranked suggestion produced by the matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "partnerId")]
    pub partner_id: String,
    pub score: f64,
    pub rationale: String,
}

/// Fields accepted when creating or updating an attendee.
/// `None` leaves the stored value untouched on update.
#[derive(Debug, Clone, Default)]
pub struct AttendeeUpsert {
    pub id: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub bio: Option<String>,
    pub interests: Option<Vec<String>>,
    pub goals: Option<Vec<String>>,
    pub availability: Option<String>,
    pub email: Option<String>,
    pub consent_intro: Option<bool>,
    pub event_id: Option<String>,
}

/// Candidate pool query parameters
#[derive(Debug, Clone)]
pub struct CandidatePoolQuery {
    /// Only attendees of this event are returned; `None` means the global pool
    pub event_scope: Option<String>,
    pub exclude_id: String,
    /// Upper bound on returned candidates
    pub cap: usize,
}

/// Listing query for the attendee directory
#[derive(Debug, Clone)]
pub struct AttendeeListQuery {
    pub event_id: Option<String>,
    pub limit: usize,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub interests: f64,
    pub goals: f64,
    pub availability: f64,
    pub complementary_bonus: f64,
    pub strong_overlap_bonus: f64,
    pub same_company_penalty: f64,
    /// Shared interest tags needed before an overlap counts as strong
    pub strong_overlap_min: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            interests: 0.6,
            goals: 0.3,
            availability: 0.1,
            complementary_bonus: 0.05,
            strong_overlap_bonus: 0.05,
            same_company_penalty: 0.05,
            strong_overlap_min: 2,
        }
    }
}

/// Lifecycle of an introduction between two attendees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntroStatus {
    Proposed,
    Accepted,
    Declined,
    /// Both sides confirmed they actually met
    Met,
}

impl IntroStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntroStatus::Proposed => "proposed",
            IntroStatus::Accepted => "accepted",
            IntroStatus::Declined => "declined",
            IntroStatus::Met => "met",
        }
    }

    /// Status reached by applying `action`, `None` when the move is not allowed
    ///
    /// A proposed intro can be accepted or declined, an accepted one can be
    /// marked as met. Repeating the action that produced the current status
    /// is a no-op.
    pub fn apply(self, action: IntroAction) -> Option<IntroStatus> {
        let target = action.target();
        if target == self {
            return Some(self);
        }

        match (self, action) {
            (IntroStatus::Proposed, IntroAction::Accept | IntroAction::Decline) => Some(target),
            (IntroStatus::Accepted, IntroAction::Met) => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for IntroStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntroStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proposed" => Ok(IntroStatus::Proposed),
            "accepted" => Ok(IntroStatus::Accepted),
            "declined" => Ok(IntroStatus::Declined),
            "met" => Ok(IntroStatus::Met),
            other => Err(format!("Unknown intro status: {}", other)),
        }
    }
}

/// Action a participant takes on an introduction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroAction {
    Accept,
    Decline,
    Met,
}

impl IntroAction {
    /// Parse the wire form (`accept`, `decline`, `met`), case-insensitive
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "accept" => Some(IntroAction::Accept),
            "decline" => Some(IntroAction::Decline),
            "met" => Some(IntroAction::Met),
            _ => None,
        }
    }

    pub fn target(&self) -> IntroStatus {
        match self {
            IntroAction::Accept => IntroStatus::Accepted,
            IntroAction::Decline => IntroStatus::Declined,
            IntroAction::Met => IntroStatus::Met,
        }
    }
}

/// Introduction requested by `requester_id` towards `partner_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intro {
    pub id: String,
    #[serde(rename = "requesterId")]
    pub requester_id: String,
    #[serde(rename = "partnerId")]
    pub partner_id: String,
    pub status: IntroStatus,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Intro {
    pub fn involves(&self, attendee_id: &str) -> bool {
        self.requester_id == attendee_id || self.partner_id == attendee_id
    }

    /// The other side of the intro as seen from `attendee_id`
    pub fn counterpart(&self, attendee_id: &str) -> &str {
        if self.requester_id == attendee_id {
            &self.partner_id
        } else {
            &self.requester_id
        }
    }
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetrics {
    pub signups: u64,
    pub matches_proposed: u64,
    /// Share of intros that were accepted (met counts as accepted)
    pub intro_acceptance_rate: f64,
    pub meetings_confirmed: u64,
}

impl EventMetrics {
    pub fn from_counts(
        signups: u64,
        matches_proposed: u64,
        intros_total: u64,
        intros_accepted: u64,
        meetings_confirmed: u64,
    ) -> Self {
        let intro_acceptance_rate = if intros_total > 0 {
            intros_accepted as f64 / intros_total as f64
        } else {
            0.0
        };

        Self {
            signups,
            matches_proposed,
            intro_acceptance_rate,
            meetings_confirmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_tags_become_empty() {
        let json = r#"{"id":"a1","interests":null,"goals":"networking"}"#;
        let profile: AttendeeProfile = serde_json::from_str(json).unwrap();

        assert!(profile.interests.is_empty());
        assert!(profile.goals.is_empty());
    }

    #[test]
    fn test_non_string_tags_skipped() {
        let json = r#"{"id":"a1","interests":["ai", 3, null, "climate"]}"#;
        let profile: AttendeeProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.interests, vec!["ai", "climate"]);
    }

    #[test]
    fn test_snake_case_aliases() {
        let json = r#"{"id":"a1","event_id":"ev1","consent_intro":true}"#;
        let profile: AttendeeProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.event_id.as_deref(), Some("ev1"));
        assert_eq!(profile.consent_intro, Some(true));
    }

    #[test]
    fn test_display_name_fallback() {
        let mut profile = AttendeeProfile {
            id: "a1".to_string(),
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "a1");

        profile.name = Some("Ada".to_string());
        assert_eq!(profile.display_name(), "Ada");
    }

    #[test]
    fn test_suggestion_wire_format() {
        let suggestion = Suggestion {
            partner_id: "b2".to_string(),
            score: 0.5,
            rationale: "Shared interests (50%)".to_string(),
        };
        let json = serde_json::to_value(&suggestion).unwrap();

        assert_eq!(json["partnerId"], "b2");
        assert_eq!(json["rationale"], "Shared interests (50%)");
    }

    #[test]
    fn test_intro_transitions() {
        use IntroAction::*;

        assert_eq!(IntroStatus::Proposed.apply(Accept), Some(IntroStatus::Accepted));
        assert_eq!(IntroStatus::Proposed.apply(Decline), Some(IntroStatus::Declined));
        assert_eq!(IntroStatus::Accepted.apply(Met), Some(IntroStatus::Met));
        assert_eq!(IntroStatus::Accepted.apply(Accept), Some(IntroStatus::Accepted));

        assert_eq!(IntroStatus::Proposed.apply(Met), None);
        assert_eq!(IntroStatus::Declined.apply(Accept), None);
        assert_eq!(IntroStatus::Met.apply(Decline), None);
    }

    #[test]
    fn test_intro_status_text() {
        assert_eq!("Accepted".parse::<IntroStatus>(), Ok(IntroStatus::Accepted));
        assert!("maybe".parse::<IntroStatus>().is_err());
        assert_eq!(serde_json::to_value(IntroStatus::Met).unwrap(), "met");
        assert_eq!(IntroAction::parse(" DECLINE "), Some(IntroAction::Decline));
        assert_eq!(IntroAction::parse("ignore"), None);
    }

    #[test]
    fn test_intro_counterpart() {
        let intro = Intro {
            id: "i1".to_string(),
            requester_id: "a".to_string(),
            partner_id: "b".to_string(),
            status: IntroStatus::Proposed,
            created_at: None,
        };

        assert_eq!(intro.counterpart("a"), "b");
        assert_eq!(intro.counterpart("b"), "a");
        assert!(intro.involves("b"));
        assert!(!intro.involves("c"));
    }

    #[test]
    fn test_acceptance_rate() {
        let metrics = EventMetrics::from_counts(10, 4, 4, 1, 0);
        assert_eq!(metrics.intro_acceptance_rate, 0.25);

        let empty = EventMetrics::from_counts(3, 0, 0, 0, 0);
        assert_eq!(empty.intro_acceptance_rate, 0.0);

        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["matchesProposed"], 4);
        assert_eq!(json["introAcceptanceRate"], 0.25);
    }
}
