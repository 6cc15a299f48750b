// Pipelines: end-to-end workflows that wire fetching to ranking.

pub mod recommend;
