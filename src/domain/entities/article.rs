use serde::{Deserialize, Serialize};

/// One article returned by the news source. The URL is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub url: String,
    pub title: String,
    pub description: String,
    pub source: String,
}

impl ArticleRef {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: description.into(),
            source: source.into(),
        }
    }
}
