/// Daily price history source.
///
/// Returns the raw response payload; its shape is classified by the
/// enrichment use case. `Err` carries a transport failure message.
#[async_trait::async_trait]
pub trait PriceHistory: Send + Sync {
    async fn daily_series(&self, ticker: &str) -> Result<serde_json::Value, String>;
}
