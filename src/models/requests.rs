use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::domain::{AttendeeUpsert, IntroAction};

/// Request to run matching for one attendee
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunMatchRequest {
    #[validate(length(min = 1, message = "attendeeId is required"))]
    #[serde(rename = "attendeeId", alias = "attendee_id", default)]
    pub attendee_id: String,
    /// Anything that is not a number falls back to the configured default
    #[serde(default, deserialize_with = "lenient_limit")]
    pub limit: Option<usize>,
}

impl RunMatchRequest {
    /// Trimmed attendee id, `None` when blank
    pub fn requester_id(&self) -> Option<&str> {
        Some(self.attendee_id.trim()).filter(|id| !id.is_empty())
    }
}

fn lenient_limit<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(|v| v as usize)
            .or_else(|| n.as_f64().map(|f| if f > 0.0 { f as usize } else { 0 })),
        _ => None,
    })
}

/// Create or update an attendee profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpsertAttendeeRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub role: Option<String>,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
    #[serde(default)]
    pub goals: Option<Vec<String>>,
    #[serde(default)]
    pub availability: Option<String>,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "consentIntro", alias = "consent_intro", default)]
    pub consent_intro: Option<bool>,
    #[serde(rename = "eventCode", alias = "event_code", default)]
    pub event_code: Option<String>,
}

impl UpsertAttendeeRequest {
    /// True when no profile field was supplied (id and event code alone do not count)
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.role.is_none()
            && self.company.is_none()
            && self.bio.is_none()
            && self.interests.is_none()
            && self.goals.is_none()
            && self.availability.is_none()
            && self.email.is_none()
            && self.consent_intro.is_none()
    }

    /// Normalised event slug, if a non-blank code was given
    pub fn event_slug(&self) -> Option<String> {
        self.event_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase)
    }

    pub fn into_upsert(self, event_id: Option<String>) -> AttendeeUpsert {
        AttendeeUpsert {
            id: self.id.filter(|id| !id.trim().is_empty()),
            name: self.name,
            role: self.role,
            company: self.company,
            bio: self.bio,
            interests: self.interests,
            goals: self.goals,
            availability: self.availability,
            email: self.email,
            consent_intro: self.consent_intro,
            event_id,
        }
    }
}

/// Attendee lookup query string
///
/// `GET /api/v1/attendees?id=..` | `?ids=a,b` | `?eventId=..` | `?eventCode=..`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendeeLookupQuery {
    pub id: Option<String>,
    pub ids: Option<String>,
    #[serde(rename = "eventId", alias = "event_id")]
    pub event_id: Option<String>,
    #[serde(rename = "eventCode", alias = "event_code")]
    pub event_code: Option<String>,
}

impl AttendeeLookupQuery {
    /// Comma-separated `ids` parameter split into trimmed, non-empty ids
    pub fn id_list(&self) -> Option<Vec<String>> {
        self.ids.as_ref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

/// Trim an optional id, dropping blanks
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Ask for an introduction to a suggested partner
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestIntroRequest {
    #[serde(rename = "requesterId", alias = "requester_id", default)]
    pub requester_id: Option<String>,
    #[serde(rename = "partnerId", alias = "partner_id", default)]
    pub partner_id: Option<String>,
}

impl RequestIntroRequest {
    /// Both ids, trimmed, when both are present
    pub fn participants(&self) -> Option<(&str, &str)> {
        Some((non_blank(&self.requester_id)?, non_blank(&self.partner_id)?))
    }
}

/// Accept, decline or confirm an intro as one of its participants
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntroActionRequest {
    #[serde(rename = "attendeeId", alias = "attendee_id", default)]
    pub attendee_id: Option<String>,
    #[serde(rename = "introId", alias = "intro_id", default)]
    pub intro_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

impl IntroActionRequest {
    /// `(attendee_id, intro_id, action)` when all three are present and the action is known
    pub fn parts(&self) -> Option<(&str, &str, IntroAction)> {
        let action = self.action.as_deref().and_then(IntroAction::parse)?;
        Some((non_blank(&self.attendee_id)?, non_blank(&self.intro_id)?, action))
    }
}

/// Link-based response to an intro
///
/// `GET /api/v1/intros/respond?id=..&action=accept|decline`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntroRespondQuery {
    pub id: Option<String>,
    pub action: Option<String>,
}

impl IntroRespondQuery {
    /// Only accept and decline are reachable through a link
    pub fn parts(&self) -> Option<(&str, IntroAction)> {
        let action = match self.action.as_deref().and_then(IntroAction::parse)? {
            IntroAction::Met => return None,
            action => action,
        };
        Some((non_blank(&self.id)?, action))
    }
}

/// `GET /api/v1/intros/mine?attendeeId=..`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MyIntrosQuery {
    #[serde(rename = "attendeeId", alias = "attendee_id")]
    pub attendee_id: Option<String>,
}

impl MyIntrosQuery {
    pub fn attendee_id(&self) -> Option<&str> {
        non_blank(&self.attendee_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attendee_id_fails_validation() {
        let req: RunMatchRequest = serde_json::from_str(r#"{"limit": 3}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_blank_attendee_id_has_no_requester() {
        let req: RunMatchRequest = serde_json::from_str(r#"{"attendeeId": "   "}"#).unwrap();
        assert_eq!(req.requester_id(), None);

        let req: RunMatchRequest = serde_json::from_str(r#"{"attendeeId": " a1 "}"#).unwrap();
        assert_eq!(req.requester_id(), Some("a1"));
    }

    #[test]
    fn test_non_numeric_limit_ignored() {
        let req: RunMatchRequest =
            serde_json::from_str(r#"{"attendeeId": "a1", "limit": "five"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.limit, None);

        let req: RunMatchRequest =
            serde_json::from_str(r#"{"attendeeId": "a1", "limit": 5}"#).unwrap();
        assert_eq!(req.limit, Some(5));

        let req: RunMatchRequest =
            serde_json::from_str(r#"{"attendeeId": "a1", "limit": -2}"#).unwrap();
        assert_eq!(req.limit, Some(0));
    }

    #[test]
    fn test_upsert_empty_payload() {
        let req: UpsertAttendeeRequest =
            serde_json::from_str(r#"{"id": "a1", "eventCode": "devcon"}"#).unwrap();
        assert!(req.is_empty());

        let req: UpsertAttendeeRequest = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        assert!(!req.is_empty());
    }

    #[test]
    fn test_event_slug_normalised() {
        let req = UpsertAttendeeRequest {
            event_code: Some("  DevCon-24 ".to_string()),
            ..Default::default()
        };
        assert_eq!(req.event_slug().as_deref(), Some("devcon-24"));

        let req = UpsertAttendeeRequest {
            event_code: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(req.event_slug(), None);
    }

    #[test]
    fn test_id_list_parsing() {
        let query = AttendeeLookupQuery {
            ids: Some("a1, b2,,c3 ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.id_list(),
            Some(vec!["a1".to_string(), "b2".to_string(), "c3".to_string()])
        );
    }

    #[test]
    fn test_intro_request_needs_both_ids() {
        let req: RequestIntroRequest =
            serde_json::from_str(r#"{"requesterId": "a1", "partnerId": " "}"#).unwrap();
        assert_eq!(req.participants(), None);

        let req: RequestIntroRequest =
            serde_json::from_str(r#"{"requesterId": "a1", "partnerId": "b2"}"#).unwrap();
        assert_eq!(req.participants(), Some(("a1", "b2")));
    }

    #[test]
    fn test_intro_action_parts() {
        let req: IntroActionRequest = serde_json::from_str(
            r#"{"attendeeId": "a1", "introId": "i1", "action": "accept"}"#,
        )
        .unwrap();
        assert_eq!(req.parts(), Some(("a1", "i1", IntroAction::Accept)));

        let req: IntroActionRequest = serde_json::from_str(
            r#"{"attendeeId": "a1", "introId": "i1", "action": "ignore"}"#,
        )
        .unwrap();
        assert_eq!(req.parts(), None);
    }

    #[test]
    fn test_respond_link_rejects_met() {
        let query = IntroRespondQuery {
            id: Some("i1".to_string()),
            action: Some("met".to_string()),
        };
        assert_eq!(query.parts(), None);

        let query = IntroRespondQuery {
            id: Some("i1".to_string()),
            action: Some("decline".to_string()),
        };
        assert_eq!(query.parts(), Some(("i1", IntroAction::Decline)));
    }
}
