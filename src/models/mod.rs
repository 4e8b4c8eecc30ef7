mod article;

pub use article::{Article, ArticleQuery, NewArticle, UNKNOWN_AUTHOR};
