use chrono::Local;
use rusqlite::{params, params_from_iter, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{Article, ArticleQuery, NewArticle, UNKNOWN_AUTHOR};

use super::schema::SCHEMA;

const ARTICLE_COLUMNS: &str = "id, source, author, title, url, published_at, fetched_at";

/// Owned handle to the article store. Opened once per command and closed when
/// the command is done.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        tracing::debug!("Opened article store at {}", db_path);

        Ok(Self { conn })
    }

    /// Insert one article unless its url is already stored.
    /// Returns `false` (and changes nothing) on a url collision.
    pub async fn insert_article(&self, article: NewArticle) -> Result<bool> {
        let inserted = self
            .conn
            .call(move |conn| Ok(insert_or_ignore(conn, &article)?))
            .await?;
        if !inserted {
            tracing::debug!("Skipping duplicate article");
        }
        Ok(inserted)
    }

    /// Insert each article through `insert_article`. Returns how many rows were new.
    pub async fn insert_articles(&self, articles: Vec<NewArticle>) -> Result<usize> {
        let mut count = 0;
        for article in articles {
            if self.insert_article(article).await? {
                count += 1;
            }
        }
        Ok(count)
    }

    pub async fn query_articles(&self, query: ArticleQuery) -> Result<Vec<Article>> {
        let articles = self
            .conn
            .call(move |conn| {
                let mut sql = format!("SELECT {} FROM news WHERE 1=1", ARTICLE_COLUMNS);
                let mut values: Vec<String> = Vec::new();

                if let Some(keyword) = &query.keyword {
                    sql.push_str(" AND title LIKE ? ESCAPE '\\'");
                    values.push(like_pattern(keyword));
                }
                if let Some(source) = &query.source {
                    sql.push_str(" AND source LIKE ? ESCAPE '\\'");
                    values.push(like_pattern(source));
                }
                if let Some(from) = query.from_date {
                    sql.push_str(" AND date(published_at) >= date(?)");
                    values.push(from.format("%Y-%m-%d").to_string());
                }
                if let Some(to) = query.to_date {
                    sql.push_str(" AND date(published_at) <= date(?)");
                    values.push(to.format("%Y-%m-%d").to_string());
                }
                sql.push_str(" ORDER BY id");

                let mut stmt = conn.prepare(&sql)?;
                let articles = stmt
                    .query_map(params_from_iter(values.iter()), article_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    pub async fn all_articles(&self) -> Result<Vec<Article>> {
        self.query_articles(ArticleQuery::default()).await
    }

    pub async fn count_articles(&self) -> Result<usize> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count as usize)
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

fn insert_or_ignore(conn: &rusqlite::Connection, article: &NewArticle) -> rusqlite::Result<bool> {
    let fetched_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let changed = conn.execute(
        r#"INSERT OR IGNORE INTO news (source, author, title, url, published_at, fetched_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
        params![
            article.source,
            article.author,
            article.title,
            article.url,
            article.published_at,
            fetched_at,
        ],
    )?;
    Ok(changed > 0)
}

/// Substring pattern for `LIKE ... ESCAPE '\'`, so `%` and `_` typed by the
/// user match literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// Columns are read as nullable so stores created with a looser `news` table
// (every column but `id` nullable) still load.
fn article_from_row(row: &Row) -> rusqlite::Result<Article> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };

    Ok(Article {
        id: row.get(0)?,
        source: text(1)?,
        author: row
            .get::<_, Option<String>>(2)?
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        title: text(3)?,
        url: text(4)?,
        published_at: text(5)?,
        fetched_at: text(6)?,
    })
}
