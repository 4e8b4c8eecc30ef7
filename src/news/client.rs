use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{NewArticle, UNKNOWN_AUTHOR};

/// Just enough of the body to tell success from failure. Decoded first so an
/// error reply is never rejected for lacking `articles`.
#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    status: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    articles: Option<Vec<ApiArticle>>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    source: ApiSource,
    author: Option<String>,
    title: String,
    url: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
}

#[derive(Debug, Deserialize)]
struct ApiSource {
    name: String,
}

impl From<ApiArticle> for NewArticle {
    fn from(article: ApiArticle) -> Self {
        NewArticle {
            source: article.source.name,
            author: article
                .author
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            title: article.title,
            url: article.url,
            published_at: article.published_at,
        }
    }
}

pub struct NewsApiClient {
    client: Client,
    api_url: Url,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn new(api_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let api_url = Url::parse(api_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("news-aggregator/1.0")
            .build()?;

        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    /// Run a single search against the origin. Any non-`ok` status, transport
    /// failure or malformed record is an error; nothing is partially returned.
    pub async fn search(&self, query: &str) -> Result<Vec<NewArticle>> {
        let Some(api_key) = &self.api_key else {
            return Err(AppError::MissingApiKey);
        };

        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[("q", query), ("apiKey", api_key.as_str())])
            .send()
            .await?;

        let http_status = response.status();
        let bytes = response.bytes().await?;

        let envelope: StatusEnvelope = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(e) if !http_status.is_success() => {
                return Err(anyhow::anyhow!("HTTP {} with unreadable body: {}", http_status, e).into());
            }
            Err(e) => return Err(e.into()),
        };

        match envelope.status.as_deref() {
            Some("ok") => {}
            Some(status) => {
                let message = envelope
                    .message
                    .unwrap_or_else(|| format!("status '{}'", status));
                return Err(AppError::NewsApi(message));
            }
            None => {
                return Err(AppError::NewsApi(format!(
                    "response without status (HTTP {})",
                    http_status
                )));
            }
        }

        let body: SearchResponse = serde_json::from_slice(&bytes)?;
        let articles: Vec<NewArticle> = body
            .articles
            .unwrap_or_default()
            .into_iter()
            .map(NewArticle::from)
            .collect();

        tracing::debug!("Origin returned {} articles for '{}'", articles.len(), query);

        Ok(articles)
    }
}
