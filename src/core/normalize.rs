use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::AttendeeProfile;

lazy_static! {
    /// Availability descriptors are separated by commas, ampersands or the word "and"
    static ref AVAILABILITY_SEPARATOR: Regex =
        Regex::new(r",|&|\band\b").expect("availability separator pattern is valid");
}

/// Lowercase, trim and dedupe free-text tags, discarding empty ones
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> HashSet<String> {
    tags.iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Split an availability descriptor such as "Fri PM, Sat AM" into tokens
pub fn availability_tokens(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    AVAILABILITY_SEPARATOR
        .split(&lowered)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Company name used for same-company comparison, `None` when blank
pub fn normalize_company(company: Option<&str>) -> Option<String> {
    company
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
}

/// Role text with surrounding whitespace removed, `None` when blank
#[inline]
fn normalize_role(role: Option<&str>) -> Option<&str> {
    role.map(str::trim).filter(|r| !r.is_empty())
}

/// Comparison view of an attendee, built once per profile per request
#[derive(Debug, Clone)]
pub struct NormalizedProfile<'a> {
    pub id: &'a str,
    pub event_id: Option<&'a str>,
    pub role: Option<&'a str>,
    pub company: Option<String>,
    pub interests: HashSet<String>,
    pub goals: HashSet<String>,
    pub availability: HashSet<String>,
}

impl<'a> NormalizedProfile<'a> {
    pub fn new(profile: &'a AttendeeProfile) -> Self {
        Self {
            id: &profile.id,
            event_id: profile.event_id.as_deref().filter(|e| !e.is_empty()),
            role: normalize_role(profile.role.as_deref()),
            company: normalize_company(profile.company.as_deref()),
            interests: normalize_tags(profile.interests.as_slice()),
            goals: normalize_tags(profile.goals.as_slice()),
            availability: profile
                .availability
                .as_deref()
                .map(availability_tokens)
                .unwrap_or_default(),
        }
    }
}

impl<'a> From<&'a AttendeeProfile> for NormalizedProfile<'a> {
    fn from(profile: &'a AttendeeProfile) -> Self {
        Self::new(profile)
    }
}
