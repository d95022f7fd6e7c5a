//! Role complementarity heuristics.
//!
//! A [`RoleClassifier`] decides whether a requester's role and a candidate's
//! role complement each other (e.g. a founder looking at an engineer). The
//! matcher only asks the classifier when both roles are non-blank.

use regex::Regex;

/// Decides whether two roles are complementary.
///
/// Implementations must be thread-safe so a single matcher can serve
/// concurrent requests. Any `Fn(&str, &str) -> bool + Send + Sync` closure
/// is a classifier.
pub trait RoleClassifier: Send + Sync {
    /// `requester_role` and `candidate_role` are trimmed and never empty.
    fn is_complementary(&self, requester_role: &str, candidate_role: &str) -> bool;
}

impl<F> RoleClassifier for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn is_complementary(&self, requester_role: &str, candidate_role: &str) -> bool {
        self(requester_role, candidate_role)
    }
}

/// Default keyword classifier.
///
/// Fires when a founder/executive meets a builder or investor, or when a
/// builder meets a product person or founder.
#[derive(Debug, Clone)]
pub struct PatternRoleClassifier {
    founder: Regex,
    builder: Regex,
    investor: Regex,
    product: Regex,
}

impl PatternRoleClassifier {
    pub fn new() -> Self {
        // Patterns are literals; compiling them cannot fail
        Self {
            founder: Regex::new(r"(?i)founder|ceo|cto|co-?founder").expect("founder pattern"),
            builder: Regex::new(r"(?i)engineer|developer|data|scientist|ml|ai").expect("builder pattern"),
            investor: Regex::new(r"(?i)invest(or|ment)").expect("investor pattern"),
            product: Regex::new(r"(?i)product|founder|cto").expect("product pattern"),
        }
    }
}

impl Default for PatternRoleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleClassifier for PatternRoleClassifier {
    fn is_complementary(&self, requester_role: &str, candidate_role: &str) -> bool {
        let founder_meets_talent = self.founder.is_match(requester_role)
            && (self.builder.is_match(candidate_role) || self.investor.is_match(candidate_role));

        let builder_meets_product =
            self.builder.is_match(requester_role) && self.product.is_match(candidate_role);

        founder_meets_talent || builder_meets_product
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_founder_and_engineer() {
        let classifier = PatternRoleClassifier::new();
        assert!(classifier.is_complementary("Founder", "Engineer"));
        assert!(classifier.is_complementary("Co-founder & CEO", "ML researcher"));
    }

    #[test]
    fn test_founder_and_investor() {
        let classifier = PatternRoleClassifier::new();
        assert!(classifier.is_complementary("CEO", "Angel Investor"));
        assert!(classifier.is_complementary("cofounder", "Investment associate"));
    }

    #[test]
    fn test_builder_and_product() {
        let classifier = PatternRoleClassifier::new();
        assert!(classifier.is_complementary("Backend Developer", "Product Manager"));
        assert!(classifier.is_complementary("Data Scientist", "CTO"));
    }

    #[test]
    fn test_direction_matters() {
        let classifier = PatternRoleClassifier::new();
        // A designer requesting a founder fires neither branch
        assert!(!classifier.is_complementary("Designer", "Founder"));
        assert!(!classifier.is_complementary("Product Manager", "Designer"));
    }

    #[test]
    fn test_closure_classifier() {
        let same_role = |a: &str, b: &str| a.eq_ignore_ascii_case(b);
        assert!(same_role.is_complementary("Designer", "designer"));
        assert!(!same_role.is_complementary("Designer", "Engineer"));
    }
}
