use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Author recorded when the origin leaves it out.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// A stored article. Field order matches the `news` table and the export columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub source: String,
    pub author: String,
    pub title: String,
    pub url: String,
    pub published_at: String,
    pub fetched_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub source: String,
    pub author: String,
    pub title: String,
    pub url: String,
    pub published_at: String,
}

/// Conjunctive filters for listing. `None` imposes no constraint.
/// Date bounds are inclusive and compare against the date part of `published_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    pub keyword: Option<String>,
    pub source: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}
