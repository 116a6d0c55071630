use crate::domain::ports::price_history::PriceHistory;
use reqwest::Client;
use serde_json::Value;

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Alpha Vantage `TIME_SERIES_DAILY` client. Returns the payload untouched;
/// quota notices and error messages arrive as HTTP 200 bodies and are
/// classified by the enrichment use case.
pub struct AlphaVantageSource {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageSource {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl PriceHistory for AlphaVantageSource {
    async fn daily_series(&self, ticker: &str) -> Result<Value, String> {
        let resp = self
            .client
            .get(format!("{}/query", self.base_url))
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", ticker),
                ("outputsize", "compact"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| format!("Alpha Vantage request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("Alpha Vantage returned {}", resp.status()));
        }

        resp.json()
            .await
            .map_err(|e| format!("Alpha Vantage parse error: {e}"))
    }
}
