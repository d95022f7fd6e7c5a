use std::collections::HashSet;

/// Jaccard similarity of two tag sets
///
/// |A ∩ B| / |A ∪ B|, defined as 0 when both sets are empty.
#[inline]
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = overlap_count(a, b);
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Number of tags present in both sets
#[inline]
pub fn overlap_count(a: &HashSet<String>, b: &HashSet<String>) -> usize {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|t| large.contains(*t)).count()
}

/// 1.0 when the two availability token sets share any token, else 0.0
#[inline]
pub fn availability_overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if overlap_count(a, b) > 0 { 1.0 } else { 0.0 }
}
