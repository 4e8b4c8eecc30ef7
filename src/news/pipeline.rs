use std::fmt;

use chrono::Local;

use crate::db::Repository;
use crate::error::{AppError, Result};

use super::client::NewsApiClient;
use super::fallback;

/// How a fetch ended. Origin failures are folded into `FallbackUsed` rather
/// than returned as errors.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched {
        query: String,
        count: usize,
    },
    FallbackUsed {
        query: String,
        count: usize,
        cause: AppError,
    },
}

impl FetchOutcome {
    /// Number of articles that were new to the store.
    pub fn count(&self) -> usize {
        match self {
            FetchOutcome::Fetched { count, .. } | FetchOutcome::FallbackUsed { count, .. } => *count,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchOutcome::FallbackUsed { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            FetchOutcome::Fetched { query, count } => {
                format!("Success! Added {} new unique articles for '{}'.", count, query)
            }
            FetchOutcome::FallbackUsed {
                query,
                count,
                cause,
            } => format!(
                "Fetch failed ({}). Added {} dummy articles for '{}'.",
                cause, count, query
            ),
        }
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

pub struct IngestionPipeline<'a> {
    client: &'a NewsApiClient,
    repository: &'a Repository,
}

impl<'a> IngestionPipeline<'a> {
    pub fn new(client: &'a NewsApiClient, repository: &'a Repository) -> Self {
        Self { client, repository }
    }

    /// Fetch `query` from the origin and store what is new. If the origin is
    /// unusable for any reason, placeholder articles are stored instead.
    /// Only store failures are returned as errors.
    pub async fn fetch(&self, query: &str) -> Result<FetchOutcome> {
        match self.client.search(query).await {
            Ok(articles) => {
                let received = articles.len();
                let count = self.repository.insert_articles(articles).await?;
                tracing::info!(
                    "Stored {} of {} articles for '{}'",
                    count,
                    received,
                    query
                );
                Ok(FetchOutcome::Fetched {
                    query: query.to_string(),
                    count,
                })
            }
            Err(cause) => {
                tracing::warn!("Fetch for '{}' failed, using fallback data: {}", query, cause);
                let articles = fallback::generate(query, Local::now());
                let count = self.repository.insert_articles(articles).await?;
                Ok(FetchOutcome::FallbackUsed {
                    query: query.to_string(),
                    count,
                    cause,
                })
            }
        }
    }
}
