// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod roles;
pub mod scoring;
pub mod similarity;

pub use filters::{passes_threshold, is_self, in_same_scope, is_eligible};
pub use matcher::{Matcher, MatcherConfig, MatchResult, TieBreak, DEFAULT_MIN_SCORE};
pub use normalize::{normalize_tags, availability_tokens, normalize_company, NormalizedProfile};
pub use roles::{RoleClassifier, PatternRoleClassifier};
pub use scoring::{score_pair, PairScore};
pub use similarity::{jaccard, overlap_count, availability_overlap};
