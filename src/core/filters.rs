use crate::core::normalize::NormalizedProfile;
use crate::core::scoring::PairScore;

/// Whether a scored pair survives the final cut
///
/// A pair needs interest or goal overlap, and a score at or above `min_score`.
#[inline]
pub fn passes_threshold(pair: &PairScore, min_score: f64) -> bool {
    pair.has_signal && pair.score >= min_score
}

/// Candidate is the requester itself
#[inline]
pub fn is_self(requester: &NormalizedProfile<'_>, candidate: &NormalizedProfile<'_>) -> bool {
    requester.id == candidate.id
}

/// Candidate belongs to the requester's event scope
///
/// A requester without a scope matches against everyone.
#[inline]
pub fn in_same_scope(requester: &NormalizedProfile<'_>, candidate: &NormalizedProfile<'_>) -> bool {
    match requester.event_id {
        Some(scope) => candidate.event_id == Some(scope),
        None => true,
    }
}

/// Pre-scoring gate: drops the requester itself and anyone outside its event
#[inline]
pub fn is_eligible(requester: &NormalizedProfile<'_>, candidate: &NormalizedProfile<'_>) -> bool {
    !is_self(requester, candidate) && in_same_scope(requester, candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendeeProfile;

    fn create_test_profile(id: &str, event_id: Option<&str>) -> AttendeeProfile {
        AttendeeProfile {
            id: id.to_string(),
            event_id: event_id.map(str::to_string),
            ..Default::default()
        }
    }

    fn pair(has_signal: bool, score: f64) -> PairScore {
        PairScore {
            tag_sim: 0.0,
            goal_sim: 0.0,
            avail_sim: 0.0,
            interest_overlap: 0,
            strong_overlap: false,
            complementary: false,
            same_company: false,
            has_signal,
            score,
        }
    }

    #[test]
    fn test_threshold() {
        assert!(passes_threshold(&pair(true, 0.2), 0.15));
        assert!(passes_threshold(&pair(true, 0.15), 0.15));
        assert!(!passes_threshold(&pair(true, 0.1), 0.15));
    }

    #[test]
    fn test_no_signal_rejected_regardless_of_score() {
        assert!(!passes_threshold(&pair(false, 0.9), 0.0));
    }

    #[test]
    fn test_self_excluded() {
        let me = create_test_profile("me", None);
        let other = create_test_profile("other", None);

        let me_view = NormalizedProfile::new(&me);
        assert!(!is_eligible(&me_view, &me_view));
        assert!(is_eligible(&me_view, &NormalizedProfile::new(&other)));
    }

    #[test]
    fn test_scope() {
        let scoped = create_test_profile("me", Some("ev1"));
        let same = create_test_profile("a", Some("ev1"));
        let other = create_test_profile("b", Some("ev2"));
        let unscoped = create_test_profile("c", None);

        let me = NormalizedProfile::new(&scoped);
        assert!(in_same_scope(&me, &NormalizedProfile::new(&same)));
        assert!(!in_same_scope(&me, &NormalizedProfile::new(&other)));
        assert!(!in_same_scope(&me, &NormalizedProfile::new(&unscoped)));

        let global = NormalizedProfile::new(&unscoped);
        assert!(in_same_scope(&global, &NormalizedProfile::new(&other)));
    }
}
