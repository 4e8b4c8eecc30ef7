use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::db::Repository;
use crate::error::Result;
use crate::models::{Article, ArticleQuery};
use crate::news::{FetchOutcome, IngestionPipeline, NewsApiClient};
use crate::services::{ExportFormat, Exporter};

/// Everything one command needs. The store is opened in `new` and released
/// in `close`.
pub struct App {
    pub default_query: String,

    // Services
    repository: Repository,
    client: NewsApiClient,
    exporter: Exporter,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let repository = Repository::new(&config.db_path).await?;
        tracing::debug!("Store holds {} articles", repository.count_articles().await?);
        let client = NewsApiClient::new(
            &config.api_url,
            config.news_api_key.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let exporter = Exporter::new(&config.export_dir);

        if config.news_api_key.is_none() {
            tracing::warn!("No news API key configured; fetch will only insert fallback data");
        }

        Ok(Self {
            default_query: config.default_query.clone(),
            repository,
            client,
            exporter,
        })
    }

    pub async fn fetch(&self, query: &str) -> Result<FetchOutcome> {
        IngestionPipeline::new(&self.client, &self.repository)
            .fetch(query)
            .await
    }

    pub async fn list(&self, query: ArticleQuery) -> Result<Vec<Article>> {
        self.repository.query_articles(query).await
    }

    pub async fn export(&self, format: ExportFormat) -> Result<Option<PathBuf>> {
        self.exporter.export(&self.repository, format).await
    }

    pub async fn close(self) -> Result<()> {
        self.repository.close().await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn test_config(dir: &tempfile::TempDir, api_url: String, key: Option<&str>) -> Config {
        Config {
            db_path: dir.path().join("news.db").to_string_lossy().to_string(),
            news_api_key: key.map(String::from),
            api_url,
            default_query: "technology".to_string(),
            export_dir: dir.path().join("exports").to_string_lossy().to_string(),
            request_timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn fetch_list_export_round() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/everything").query_param("q", "chip");
                then.status(200).json_body(json!({
                    "status": "ok",
                    "articles": [
                        {
                            "source": {"name": "Reuters"},
                            "author": "Jane Doe",
                            "title": "New chip fab announced",
                            "url": "https://example.com/chip-fab",
                            "publishedAt": "2024-01-10T08:00:00Z"
                        },
                        {
                            "source": {"name": "Bloomberg"},
                            "title": "Chip stocks slide",
                            "url": "https://example.com/chip-stocks",
                            "publishedAt": "2024-02-02T08:00:00Z"
                        }
                    ]
                }));
            })
            .await;
        let config = test_config(&dir, server.url("/v2/everything"), Some("key"));

        let app = App::new(&config).await.unwrap();
        let outcome = app.fetch("chip").await.unwrap();
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.count(), 2);

        let reuters = app
            .list(ArticleQuery {
                source: Some("reuters".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(reuters.len(), 1);
        assert_eq!(reuters[0].author, "Jane Doe");

        let path = app.export(ExportFormat::Csv).await.unwrap().unwrap();
        assert!(path.starts_with(dir.path().join("exports")));
        app.close().await.unwrap();

        // Data survives reopening the same store.
        let reopened = App::new(&config).await.unwrap();
        assert_eq!(reopened.list(ArticleQuery::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn fetch_without_key_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir, "https://newsapi.org/v2/everything".to_string(), None);

        let app = App::new(&config).await.unwrap();
        let outcome = app.fetch("offline").await.unwrap();

        assert!(outcome.is_fallback());
        assert_eq!(outcome.count(), 2);
        assert_eq!(app.default_query, "technology");
    }

    #[tokio::test]
    async fn export_of_empty_store_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir, "https://newsapi.org/v2/everything".to_string(), None);

        let app = App::new(&config).await.unwrap();
        assert!(app.export(ExportFormat::Excel).await.unwrap().is_none());
    }
}
