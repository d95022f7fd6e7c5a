use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::core::{
    filters::{is_eligible, passes_threshold},
    normalize::NormalizedProfile,
    roles::{PatternRoleClassifier, RoleClassifier},
    scoring::score_pair,
};
use crate::models::{AttendeeProfile, ScoringWeights, Suggestion};

/// Minimum score a suggestion needs when nothing else is configured
pub const DEFAULT_MIN_SCORE: f64 = 0.15;

/// Ordering applied between suggestions with equal scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the order in which the candidate pool was supplied
    #[default]
    InputOrder,
    /// Ascending partner id, independent of pool order
    PartnerId,
}

/// Matcher tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    pub weights: ScoringWeights,
    pub min_score: f64,
    pub tie_break: TieBreak,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            min_score: DEFAULT_MIN_SCORE,
            tie_break: TieBreak::default(),
        }
    }
}

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub suggestions: Vec<Suggestion>,
    pub total_candidates: usize,
    /// Candidates that passed the signal and score gates, before truncation
    pub scored: usize,
}

/// Compatibility ranking for event attendees
///
/// # Pipeline Stages
/// 1. Normalisation of tags, availability and company
/// 2. Self and event-scope exclusion
/// 3. Pair scoring
/// 4. Signal + threshold filtering
/// 5. Ranking and truncation
///
/// The matcher holds no mutable state and can be shared across workers.
/// Callers are expected to pass a pool already restricted to the
/// requester's event and without the requester; both are re-checked here.
#[derive(Clone)]
pub struct Matcher {
    config: MatcherConfig,
    classifier: Arc<dyn RoleClassifier>,
}

impl Matcher {
    pub fn new(config: MatcherConfig) -> Self {
        let min_score = if config.min_score.is_finite() {
            config.min_score
        } else {
            DEFAULT_MIN_SCORE
        };

        Self {
            config: MatcherConfig { min_score, ..config },
            classifier: Arc::new(PatternRoleClassifier::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(MatcherConfig::default())
    }

    /// Replace the role complementarity strategy
    pub fn with_classifier<C>(mut self, classifier: C) -> Self
    where
        C: RoleClassifier + 'static,
    {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Rank `candidates` for `requester`, returning at most `limit` suggestions
    ///
    /// Never fails: missing fields count as empty and an empty pool yields
    /// an empty list.
    pub fn compute_suggestions(
        &self,
        requester: &AttendeeProfile,
        candidates: &[AttendeeProfile],
        limit: usize,
    ) -> Vec<Suggestion> {
        self.find_matches(requester, candidates, limit).suggestions
    }

    /// Same as [`Matcher::compute_suggestions`], with pool statistics
    pub fn find_matches(
        &self,
        requester: &AttendeeProfile,
        candidates: &[AttendeeProfile],
        limit: usize,
    ) -> MatchResult {
        let total_candidates = candidates.len();

        if limit == 0 {
            return MatchResult {
                suggestions: Vec::new(),
                total_candidates,
                scored: 0,
            };
        }

        let me = NormalizedProfile::new(requester);
        let classifier = self.classifier.as_ref();

        let mut ranked: Vec<Suggestion> = candidates
            .iter()
            .filter_map(|candidate| {
                let other = NormalizedProfile::new(candidate);
                if !is_eligible(&me, &other) {
                    return None;
                }

                let pair = score_pair(&me, &other, &self.config.weights, classifier);
                if !passes_threshold(&pair, self.config.min_score) {
                    return None;
                }

                Some(Suggestion {
                    partner_id: candidate.id.clone(),
                    score: pair.score,
                    rationale: pair.rationale(),
                })
            })
            .collect();

        let scored = ranked.len();

        // Stable sort: equal scores keep pool order unless a partner-id tie-break is set
        let tie_break = self.config.tie_break;
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| match tie_break {
                    TieBreak::InputOrder => Ordering::Equal,
                    TieBreak::PartnerId => a.partner_id.cmp(&b.partner_id),
                })
        });

        ranked.truncate(limit);

        MatchResult {
            suggestions: ranked,
            total_candidates,
            scored,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_candidate(id: &str, interests: &[&str]) -> AttendeeProfile {
        AttendeeProfile {
            id: id.to_string(),
            name: Some(format!("Attendee {}", id)),
            interests: interests.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn create_requester() -> AttendeeProfile {
        create_candidate("me", &["ai", "fintech"])
    }

    #[test]
    fn test_find_matches_basic() {
        let matcher = Matcher::with_defaults();
        let requester = create_requester();

        let candidates = vec![
            create_candidate("1", &["ai", "fintech"]), // Full overlap
            create_candidate("2", &["gardening"]),     // No signal
            create_candidate("3", &["ai", "climate"]), // Partial
        ];

        let result = matcher.find_matches(&requester, &candidates, 10);

        assert_eq!(result.total_candidates, 3);
        assert_eq!(result.scored, 2);
        assert_eq!(result.suggestions[0].partner_id, "1");
        assert_eq!(result.suggestions[1].partner_id, "3");
    }

    #[test]
    fn test_skips_requester_in_pool() {
        let matcher = Matcher::with_defaults();
        let requester = create_requester();
        let candidates = vec![requester.clone(), create_candidate("1", &["ai"])];

        let suggestions = matcher.compute_suggestions(&requester, &candidates, 10);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].partner_id, "1");
    }

    #[test]
    fn test_skips_other_event_scope() {
        let matcher = Matcher::with_defaults();
        let mut requester = create_requester();
        requester.event_id = Some("ev1".to_string());

        let mut same = create_candidate("1", &["ai"]);
        same.event_id = Some("ev1".to_string());
        let mut other = create_candidate("2", &["ai", "fintech"]);
        other.event_id = Some("ev2".to_string());

        let suggestions = matcher.compute_suggestions(&requester, &[other, same], 10);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].partner_id, "1");
    }

    #[test]
    fn test_zero_limit() {
        let matcher = Matcher::with_defaults();
        let requester = create_requester();
        let candidates = vec![create_candidate("1", &["ai", "fintech"])];

        assert!(matcher.compute_suggestions(&requester, &candidates, 0).is_empty());
    }

    #[test]
    fn test_respects_limit() {
        let matcher = Matcher::with_defaults();
        let requester = create_requester();
        let candidates: Vec<AttendeeProfile> = (0..20)
            .map(|i| create_candidate(&i.to_string(), &["ai"]))
            .collect();

        let suggestions = matcher.compute_suggestions(&requester, &candidates, 5);

        assert_eq!(suggestions.len(), 5);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let matcher = Matcher::with_defaults();
        let requester = create_requester();
        let candidates = vec![
            create_candidate("c", &["ai"]),
            create_candidate("a", &["ai"]),
            create_candidate("b", &["ai"]),
        ];

        let ids: Vec<String> = matcher
            .compute_suggestions(&requester, &candidates, 10)
            .into_iter()
            .map(|s| s.partner_id)
            .collect();

        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_ties_by_partner_id() {
        let matcher = Matcher::new(MatcherConfig {
            tie_break: TieBreak::PartnerId,
            ..MatcherConfig::default()
        });
        let requester = create_requester();
        let candidates = vec![
            create_candidate("c", &["ai"]),
            create_candidate("a", &["ai"]),
            create_candidate("b", &["ai"]),
        ];

        let ids: Vec<String> = matcher
            .compute_suggestions(&requester, &candidates, 10)
            .into_iter()
            .map(|s| s.partner_id)
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_min_score_configurable() {
        let strict = Matcher::new(MatcherConfig {
            min_score: 0.5,
            ..MatcherConfig::default()
        });
        let requester = create_requester();
        let candidates = vec![
            create_candidate("1", &["ai", "fintech"]),
            create_candidate("2", &["ai", "climate"]),
        ];

        let suggestions = strict.compute_suggestions(&requester, &candidates, 10);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].partner_id, "1");
    }

    #[test]
    fn test_non_finite_min_score_falls_back() {
        let matcher = Matcher::new(MatcherConfig {
            min_score: f64::NAN,
            ..MatcherConfig::default()
        });
        assert_eq!(matcher.config().min_score, DEFAULT_MIN_SCORE);
    }

    #[test]
    fn test_custom_classifier() {
        let mut requester = create_requester();
        requester.role = Some("Designer".to_string());
        let mut candidate = create_candidate("1", &["ai", "climate"]);
        candidate.role = Some("Illustrator".to_string());

        let matcher = Matcher::with_defaults().with_classifier(|_: &str, _: &str| true);
        let suggestions = matcher.compute_suggestions(&requester, &[candidate], 10);

        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].rationale.contains("Complementary roles"));
        assert!((suggestions[0].score - 0.25).abs() < 1e-9);
    }
}
