//! EventLinq Match - compatibility scoring and matchmaking for event attendees
//!
//! This library provides the ranking engine used to suggest introductions
//! between attendees of the same event. Attendees are scored on shared
//! interests, shared goals, availability overlap and role complementarity,
//! low-signal pairs are dropped, and the rest are ranked with a rationale.
//! Attendees can then request consent-based introductions to their matches.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, MatcherConfig, MatchResult, TieBreak, RoleClassifier, PatternRoleClassifier};
pub use crate::models::{AttendeeProfile, Suggestion, ScoringWeights, RunMatchRequest, RunMatchResponse};
pub use crate::services::{IntroStore, ProfileStore, StoreError};
