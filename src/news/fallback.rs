use chrono::{DateTime, Local};

use crate::models::NewArticle;

/// Placeholder articles used when the origin cannot be reached or refuses
/// the request. The url embeds `now` to the nanosecond so repeated fallbacks
/// for the same query never collide.
pub fn generate(query: &str, now: DateTime<Local>) -> Vec<NewArticle> {
    let stamp = format!("{}.{:09}", now.timestamp(), now.timestamp_subsec_nanos());
    let encoded = urlencoding::encode(query);
    let published_at = now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string();

    vec![
        NewArticle {
            source: "Dummy News".to_string(),
            author: "AI Assistant".to_string(),
            title: format!("Dummy Article 1 about {}", query),
            url: format!("http://dummy.news.com/article1_{}_{}", encoded, stamp),
            published_at: published_at.clone(),
        },
        NewArticle {
            source: "Fake Press".to_string(),
            author: "Bot Reporter".to_string(),
            title: format!("Another Dummy Headline on {}", query),
            url: format!("http://fake.press.org/headline2_{}_{}", encoded, stamp),
            published_at,
        },
    ]
}
