// Adjacent: related-repository recommendations for GitHub READMEs
//
// This is the library root. The similarity core (scoring and ranking) is
// pure; the GitHub fetcher, pipeline and output modules wrap it.

pub mod config;
pub mod github;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod similarity;
