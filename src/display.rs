use crate::models::Article;

const RULE_WIDTH: usize = 80;
const TITLE_WIDTH: usize = 55;

/// Render the `list` output: a count line and an id/source/title table.
pub fn article_table(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "No articles found.".to_string();
    }

    let rule = "-".repeat(RULE_WIDTH);
    let mut lines = Vec::with_capacity(articles.len() + 6);
    lines.push(String::new());
    lines.push(format!("Found {} articles", articles.len()));
    lines.push(rule.clone());
    lines.push(format!("{:<5} | {:<20} | {}", "ID", "Source", "Title"));
    lines.push(rule.clone());
    for article in articles {
        lines.push(format!(
            "{:<5} | {:<20} | {}",
            article.id,
            article.source,
            truncate(&article.title, TITLE_WIDTH)
        ));
    }
    lines.push(rule);

    lines.join("\n")
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
