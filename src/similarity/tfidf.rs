// Per-run TF-IDF vocabulary and README cosine similarity.
//
// The vocabulary is fitted over the target README plus every candidate
// README in the same run, so a term that shows up in every repository of
// the account ("python", "install", "license") is weighted down and
// distinctive terms carry the comparison. Weights are only comparable
// within one run; nothing is persisted.
//
// idf(t) = ln((1 + n) / (1 + df(t))) + 1    (smoothed, never zero)
// vector = term_count * idf, L2-normalised
//
// Vectors are sparse and sorted by term index, so dot products walk both
// vectors in a fixed order and the same inputs always produce bit-identical
// scores. Ranking ties depend on that.

use std::collections::{BTreeSet, HashMap};

use super::text::tokenize;

/// Term index and inverse document frequency for one run's corpus.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    idf: Vec<f64>,
    documents: usize,
}

/// A sparse, unit-length TF-IDF vector. An empty vector means the text had
/// no recognized vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
}

impl Vocabulary {
    /// Fit a vocabulary over raw README texts.
    pub fn build<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tokenized: Vec<Vec<String>> = texts.into_iter().map(tokenize).collect();
        Self::from_tokenized(&tokenized)
    }

    /// Fit a vocabulary over documents that were already tokenized.
    pub fn from_tokenized(documents: &[Vec<String>]) -> Self {
        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for doc in documents {
            let unique: BTreeSet<&str> = doc.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        // Assign indices in sorted term order so the layout doesn't depend
        // on hash iteration order
        let terms: BTreeSet<&str> = document_frequency.keys().copied().collect();
        let n = documents.len() as f64;

        let mut index = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (i, term) in terms.into_iter().enumerate() {
            let df = document_frequency[term] as f64;
            index.insert(term.to_string(), i);
            idf.push(((1.0 + n) / (1.0 + df)).ln() + 1.0);
        }

        Self {
            index,
            idf,
            documents: documents.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    /// Number of documents the vocabulary was fitted on.
    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.index.get(term).map(|&i| self.idf[i])
    }

    /// Vectorize a raw README text. Terms outside the vocabulary are ignored.
    pub fn vectorize(&self, text: &str) -> TermVector {
        self.vectorize_tokens(&tokenize(text))
    }

    /// Vectorize an already-tokenized document.
    pub fn vectorize_tokens(&self, tokens: &[String]) -> TermVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokens {
            if let Some(&i) = self.index.get(token) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(i, tf)| (i, tf * self.idf[i]))
            .collect();
        entries.sort_by_key(|&(i, _)| i);

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm < f64::EPSILON {
            return TermVector::default();
        }
        for (_, w) in &mut entries {
            *w /= norm;
        }

        TermVector { entries }
    }
}

impl TermVector {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct vocabulary terms in the vector.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Cosine similarity with another vector from the same vocabulary.
    ///
    /// Both vectors are unit length, so this is their dot product, clamped
    /// to [0, 1] to absorb rounding on identical documents.
    pub fn cosine(&self, other: &TermVector) -> f64 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }

        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }

        dot.clamp(0.0, 1.0)
    }
}

/// README similarity of two texts under a run's vocabulary.
///
/// Returns 0.0 when either text is empty or has no recognized vocabulary.
pub fn content_similarity(vocabulary: &Vocabulary, a: &str, b: &str) -> f64 {
    vocabulary.vectorize(a).cosine(&vocabulary.vectorize(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOOM: &str = "Bloomjoin performs probabilistic dataframe joins with bloom filters";
    const SKETCH: &str = "Sketching library: bloom filters, count-min sketches, hyperloglog";
    const GAME: &str = "Voxel renderer for sandbox games with procedural terrain";

    #[test]
    fn test_identical_text_scores_one() {
        let vocab = Vocabulary::build([BLOOM, SKETCH, GAME]);
        let sim = content_similarity(&vocab, BLOOM, BLOOM);
        assert!((sim - 1.0).abs() < 1e-9, "Expected ~1.0, got {sim}");
    }

    #[test]
    fn test_empty_texts_score_zero() {
        let vocab = Vocabulary::build([BLOOM, ""]);
        assert_eq!(content_similarity(&vocab, "", ""), 0.0);
        assert_eq!(content_similarity(&vocab, BLOOM, ""), 0.0);
    }

    #[test]
    fn test_unrecognized_vocabulary_scores_zero() {
        let vocab = Vocabulary::build([BLOOM]);
        // Every token here is outside the fitted vocabulary
        assert_eq!(content_similarity(&vocab, BLOOM, "zebra quokka"), 0.0);
        assert!(vocab.vectorize("zebra quokka").is_empty());
    }

    #[test]
    fn test_related_beats_unrelated() {
        let vocab = Vocabulary::build([BLOOM, SKETCH, GAME]);
        let related = content_similarity(&vocab, BLOOM, SKETCH);
        let unrelated = content_similarity(&vocab, BLOOM, GAME);
        assert!(related > 0.0, "Shared 'bloom filters' should give overlap");
        assert!(
            related > unrelated,
            "related {related} should beat unrelated {unrelated}"
        );
    }

    #[test]
    fn test_scores_within_unit_interval_and_symmetric() {
        let vocab = Vocabulary::build([BLOOM, SKETCH, GAME]);
        for a in [BLOOM, SKETCH, GAME] {
            for b in [BLOOM, SKETCH, GAME] {
                let ab = content_similarity(&vocab, a, b);
                let ba = content_similarity(&vocab, b, a);
                assert!((0.0..=1.0).contains(&ab));
                assert!((ab - ba).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_common_terms_get_lower_idf() {
        let vocab = Vocabulary::build([
            "python bloom filters",
            "python sketches",
            "python renderer",
        ]);
        let common = vocab.idf("python").unwrap();
        let rare = vocab.idf("bloom").unwrap();
        assert!(common < rare, "idf(python)={common} should be below idf(bloom)={rare}");
        // Smoothed idf never reaches zero, even for a term in every document
        assert!((common - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let vocab = Vocabulary::build([BLOOM, SKETCH]);
        let v = vocab.vectorize(SKETCH);
        let norm: f64 = v.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_vocabulary_layout_is_deterministic() {
        let a = Vocabulary::build([BLOOM, SKETCH, GAME]);
        let b = Vocabulary::build([BLOOM, SKETCH, GAME]);
        assert_eq!(a.vectorize(SKETCH), b.vectorize(SKETCH));
        assert_eq!(a.documents(), 3);
        assert_eq!(a.len(), b.len());
    }
}
