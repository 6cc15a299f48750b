// Blended similarity score.
//
// The configured method decides which scorers run at all. Scorers are
// passed in as closures and only invoked when their result can change the
// final score: `topics` never touches README vectors, `readme` never
// intersects topic sets, and `combined` skips whichever side has zero
// weight. With a large pool this is most of the work.
//
//   combined = w * topic + (1 - w) * content      (w clamped to [0, 1])

use serde::Serialize;

use super::config::{Method, SimilarityConfig};

/// A final score plus the components that produced it.
///
/// A component is `None` when the method dispatch skipped that scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Blended {
    pub score: f64,
    pub topic: Option<f64>,
    pub content: Option<f64>,
}

/// Combine topic and content similarity according to the configured method.
pub fn blend<T, C>(config: &SimilarityConfig, topic: T, content: C) -> Blended
where
    T: FnOnce() -> f64,
    C: FnOnce() -> f64,
{
    match config.method {
        Method::Topics => {
            let t = topic();
            Blended {
                score: t.clamp(0.0, 1.0),
                topic: Some(t),
                content: None,
            }
        }
        Method::Readme => {
            let c = content();
            Blended {
                score: c.clamp(0.0, 1.0),
                topic: None,
                content: Some(c),
            }
        }
        Method::Combined => {
            let w = config.effective_weight();
            let t = config.uses_topics().then(topic);
            let c = config.uses_content().then(content);
            let score = w * t.unwrap_or(0.0) + (1.0 - w) * c.unwrap_or(0.0);
            Blended {
                score: score.clamp(0.0, 1.0),
                topic: t,
                content: c,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combined(weight: f64) -> SimilarityConfig {
        SimilarityConfig {
            method: Method::Combined,
            topic_weight: weight,
            ..Default::default()
        }
    }

    #[test]
    fn test_topics_method_skips_content() {
        let config = SimilarityConfig::default();
        let b = blend(&config, || 0.4, || panic!("content scorer must not run"));
        assert_eq!(b.score, 0.4);
        assert_eq!(b.topic, Some(0.4));
        assert_eq!(b.content, None);
    }

    #[test]
    fn test_readme_method_skips_topics() {
        let config = SimilarityConfig {
            method: Method::Readme,
            ..Default::default()
        };
        let b = blend(&config, || panic!("topic scorer must not run"), || 0.7);
        assert_eq!(b.score, 0.7);
        assert_eq!(b.topic, None);
        assert_eq!(b.content, Some(0.7));
    }

    #[test]
    fn test_combined_weighted_sum() {
        // 0.6 * 0.5 + 0.4 * 0.2 = 0.38
        let b = blend(&combined(0.6), || 0.5, || 0.2);
        assert!((b.score - 0.38).abs() < 1e-12, "Expected 0.38, got {}", b.score);
        assert_eq!(b.topic, Some(0.5));
        assert_eq!(b.content, Some(0.2));
    }

    #[test]
    fn test_combined_full_topic_weight_equals_topic_score() {
        let b = blend(&combined(1.0), || 0.25, || panic!("zero-weight side must not run"));
        assert_eq!(b.score, 0.25);
        assert_eq!(b.content, None);
    }

    #[test]
    fn test_combined_zero_topic_weight_equals_content_score() {
        let b = blend(&combined(0.0), || panic!("zero-weight side must not run"), || 0.9);
        assert_eq!(b.score, 0.9);
        assert_eq!(b.topic, None);
    }

    #[test]
    fn test_combined_out_of_range_weight_is_clamped() {
        let high = blend(&combined(3.0), || 0.3, || 0.8);
        assert_eq!(high.score, 0.3);
        let low = blend(&combined(-1.0), || 0.3, || 0.8);
        assert_eq!(low.score, 0.8);
    }
}
