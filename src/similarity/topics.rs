// Jaccard similarity for topic overlap scoring.
//
// Compares two repositories by their GitHub topic tags:
//
//   |topics_a ∩ topics_b| / |topics_a ∪ topics_b|
//
// Two repositories with no topics at all score 0.0, not 1.0. Topic-less
// repositories share no signal and must not float to the top of a ranking.

use std::collections::BTreeSet;

/// Compute the Jaccard similarity between two topic sets.
///
/// Returns a score from 0.0 (nothing shared) to 1.0 (identical sets).
pub fn topic_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Topics present in both sets, in sorted order.
pub fn shared_topics(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Vec<String> {
    a.intersection(b).cloned().collect()
}
