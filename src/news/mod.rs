mod client;
pub mod fallback;
mod pipeline;

pub use client::NewsApiClient;
pub use pipeline::{FetchOutcome, IngestionPipeline};
