// Similarity engine: topic overlap, README TF-IDF, blending and ranking.

pub mod blend;
pub mod config;
pub mod rank;
pub mod text;
pub mod tfidf;
pub mod topics;

pub use config::{ConfigError, MatchMode, Method, SimilarityConfig};
pub use rank::{rank, ScoredCandidate};
