use crate::domain::entities::article::ArticleRef;
use crate::domain::error::DomainError;
use crate::domain::ports::news_source::NewsSource;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

const DEFAULT_BASE_URL: &str = "https://newsapi.org";
const PAGE_SIZE: u32 = 100;

/// NewsAPI `/v2/everything` client.
pub struct NewsApiSource {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    source: Option<NewsApiSourceRef>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSourceRef {
    #[serde(default)]
    name: Option<String>,
}

impl NewsApiSource {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("marketbrief/0.1")
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: base_url.into(),
        }
    }
}

/// `"a" OR "b"` query string for the keyword list.
pub fn build_query(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| format!("\"{k}\""))
        .collect::<Vec<_>>()
        .join(" OR ")
}

impl NewsApiArticle {
    /// Articles without a URL cannot be deduplicated and are dropped.
    fn into_article(self) -> Option<ArticleRef> {
        let url = self.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())?;
        Some(ArticleRef::new(
            url,
            self.title.unwrap_or_default(),
            self.description.unwrap_or_default(),
            self.source.and_then(|s| s.name).unwrap_or_default(),
        ))
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    async fn fetch(&self, keywords: &[String]) -> Result<Vec<ArticleRef>, DomainError> {
        let query = build_query(keywords);
        if query.is_empty() {
            return Err(DomainError::InvalidInput("no news keywords configured".into()));
        }
        info!(%query, "Fetching financial news");

        let page_size = PAGE_SIZE.to_string();
        let resp = self
            .client
            .get(format!("{}/v2/everything", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query.as_str()),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DomainError::News(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::News(format!("NewsAPI {status}: {body}")));
        }

        let data: EverythingResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::News(format!("invalid response: {e}")))?;

        if data.status != "ok" {
            warn!(status = %data.status, message = ?data.message, "NewsAPI returned a non-ok status");
            return Ok(Vec::new());
        }

        let articles: Vec<ArticleRef> = data
            .articles
            .into_iter()
            .filter_map(NewsApiArticle::into_article)
            .collect();
        info!(count = articles.len(), "Fetched articles");
        Ok(articles)
    }
}
