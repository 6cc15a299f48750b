// GitHub metadata fetcher: REST client, repository reads, source trait.

pub mod client;
pub mod repos;
pub mod traits;
