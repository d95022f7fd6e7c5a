use crate::core::normalize::NormalizedProfile;
use crate::core::roles::RoleClassifier;
use crate::core::similarity::{availability_overlap, jaccard, overlap_count};
use crate::models::ScoringWeights;

/// Every factor behind one requester/candidate score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairScore {
    pub tag_sim: f64,
    pub goal_sim: f64,
    pub avail_sim: f64,
    /// Raw number of shared interest tags
    pub interest_overlap: usize,
    pub strong_overlap: bool,
    pub complementary: bool,
    pub same_company: bool,
    /// Any interest or goal overlap at all
    pub has_signal: bool,
    /// Final score in [0, 1]
    pub score: f64,
}

/// Calculate the compatibility score (0-1) of a candidate for a requester
///
/// Scoring formula:
/// score = clamp(
///     tag_sim * 0.6 +              # Jaccard over interests
///     goal_sim * 0.3 +             # Jaccard over goals
///     avail_sim * 0.1 +            # any shared availability slot
///     complementary_bonus +        # 0.05, only with signal
///     strong_overlap_bonus -       # 0.05, only with signal
///     same_company_penalty         # 0.05
/// , 0, 1)
pub fn score_pair(
    requester: &NormalizedProfile<'_>,
    candidate: &NormalizedProfile<'_>,
    weights: &ScoringWeights,
    classifier: &dyn RoleClassifier,
) -> PairScore {
    let tag_sim = jaccard(&requester.interests, &candidate.interests);
    let goal_sim = jaccard(&requester.goals, &candidate.goals);
    let avail_sim = availability_overlap(&requester.availability, &candidate.availability);

    let interest_overlap = overlap_count(&requester.interests, &candidate.interests);
    let strong_overlap = interest_overlap >= weights.strong_overlap_min.max(1);

    let complementary = match (requester.role, candidate.role) {
        (Some(a), Some(b)) => classifier.is_complementary(a, b),
        _ => false,
    };

    let same_company = match (&requester.company, &candidate.company) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    let has_signal = tag_sim > 0.0 || goal_sim > 0.0;

    let mut raw = tag_sim * weights.interests
        + goal_sim * weights.goals
        + avail_sim * weights.availability;

    // Bonuses never create signal on their own
    if has_signal {
        if complementary {
            raw += weights.complementary_bonus;
        }
        if strong_overlap {
            raw += weights.strong_overlap_bonus;
        }
    }

    if same_company {
        raw -= weights.same_company_penalty;
    }

    PairScore {
        tag_sim,
        goal_sim,
        avail_sim,
        interest_overlap,
        strong_overlap,
        complementary,
        same_company,
        has_signal,
        score: sanitize(raw),
    }
}

/// Clamp to [0, 1], mapping non-finite values to 0
#[inline]
fn sanitize(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

#[inline]
fn percent(sim: f64) -> i64 {
    (sim * 100.0).round() as i64
}

impl PairScore {
    /// Human-readable explanation, e.g. "Shared interests (33%) + Overlapping availability"
    ///
    /// Clauses depend only on which factors are present, not on the weights.
    pub fn rationale(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(5);

        if self.tag_sim > 0.0 {
            parts.push(format!("Shared interests ({}%)", percent(self.tag_sim)));
        }
        if self.strong_overlap {
            parts.push("Strong interest overlap".to_string());
        }
        if self.goal_sim > 0.0 {
            parts.push(format!("Similar goals ({}%)", percent(self.goal_sim)));
        }
        if self.avail_sim > 0.0 {
            parts.push("Overlapping availability".to_string());
        }
        if self.complementary {
            parts.push("Complementary roles".to_string());
        }

        if parts.is_empty() {
            return "Potentially relevant attendee".to_string();
        }
        parts.join(" + ")
    }
}
