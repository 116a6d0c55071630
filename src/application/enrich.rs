//! Price-trend enrichment for report opportunities.
//!
//! Each distinct ticker is looked up at most once per run. Lookups are
//! paced through the injected [`Pacer`], and the first quota notice from
//! the price API trips a flag on the [`EnrichmentContext`] that turns every
//! later lookup in the same run into [`TrendStatus::RateLimited`] without a
//! network call.

use crate::domain::entities::report::MarketReport;
use crate::domain::entities::trend::TrendResult;
use crate::domain::ports::pacer::Pacer;
use crate::domain::ports::price_history::PriceHistory;
use crate::domain::values::ticker;
use crate::domain::values::trend_status::TrendStatus;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Number of daily closes kept per ticker.
pub const TREND_DAYS: usize = 30;

const SERIES_KEY: &str = "Time Series (Daily)";
const CLOSE_KEY: &str = "4. close";
const NOTICE_KEYS: [&str; 2] = ["Information", "Note"];
const ERROR_KEY: &str = "Error Message";
const QUOTA_MARKERS: [&str; 3] = ["requests per day", "rate limit", "call frequency"];

/// Per-run enrichment state: the ticker cache and the sticky rate-limit flag.
#[derive(Debug, Default)]
pub struct EnrichmentContext {
    trends: HashMap<String, TrendResult>,
    rate_limited: bool,
    network_calls: usize,
}

impl EnrichmentContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trend(&self, ticker: &str) -> Option<&TrendResult> {
        self.trends.get(ticker.trim())
    }

    pub fn is_rate_limited(&self) -> bool {
        self.rate_limited
    }

    /// Requests actually sent to the price API this run.
    pub fn network_calls(&self) -> usize {
        self.network_calls
    }
}

pub struct EnrichUseCase {
    prices: Arc<dyn PriceHistory>,
    pacer: Arc<dyn Pacer>,
}

impl EnrichUseCase {
    pub fn new(prices: Arc<dyn PriceHistory>, pacer: Arc<dyn Pacer>) -> Self {
        Self { prices, pacer }
    }

    /// Look up every distinct ticker in `report` with a fresh context.
    pub async fn execute(&self, report: &MarketReport) -> EnrichmentContext {
        let mut ctx = EnrichmentContext::new();
        let tickers = distinct_tickers(report);
        info!(tickers = tickers.len(), "Fetching price trends");
        for ticker in &tickers {
            self.lookup(&mut ctx, ticker).await;
        }
        if ctx.rate_limited {
            warn!("Price API quota exhausted during this run; some trends are unavailable");
        }
        ctx
    }

    /// Trend for one ticker, using and updating `ctx`.
    pub async fn lookup(&self, ctx: &mut EnrichmentContext, ticker: &str) -> TrendResult {
        let ticker = ticker.trim();
        if let Some(cached) = ctx.trends.get(ticker) {
            return cached.clone();
        }

        let result = if ticker::is_unlisted(Some(ticker)) {
            TrendResult::failed(TrendStatus::PrivateOrNA)
        } else if ctx.rate_limited {
            TrendResult::failed(TrendStatus::RateLimited)
        } else {
            if ctx.network_calls > 0 {
                self.pacer.pause().await;
            }
            ctx.network_calls += 1;
            info!(ticker, "Fetching {TREND_DAYS}-day trend");
            match self.prices.daily_series(ticker).await {
                Ok(payload) => classify_payload(ticker, &payload),
                Err(e) => {
                    warn!(ticker, error = %e, "Network error fetching trend");
                    TrendResult::failed(TrendStatus::NetworkError)
                }
            }
        };

        if result.status == TrendStatus::RateLimited {
            ctx.rate_limited = true;
        }
        ctx.trends.insert(ticker.to_string(), result.clone());
        result
    }
}

/// Distinct non-empty tickers across all opportunities, first-seen order.
pub fn distinct_tickers(report: &MarketReport) -> Vec<String> {
    let mut seen = HashSet::new();
    report
        .opportunities()
        .filter_map(|o| ticker::normalize(o.ticker.as_deref()))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Classify a daily-series payload by its shape.
pub fn classify_payload(ticker: &str, payload: &Value) -> TrendResult {
    if let Some(series) = payload.get(SERIES_KEY).and_then(Value::as_object) {
        let mut days: Vec<(&str, f64)> = series
            .iter()
            .filter_map(|(date, bar)| close_price(bar).map(|close| (date.as_str(), close)))
            .collect();
        // ISO dates sort chronologically.
        days.sort_by(|a, b| a.0.cmp(b.0));
        let start = days.len().saturating_sub(TREND_DAYS);
        return TrendResult::success(days[start..].iter().map(|(_, close)| *close).collect());
    }

    for key in NOTICE_KEYS {
        if let Some(notice) = payload.get(key).and_then(Value::as_str) {
            let lower = notice.to_lowercase();
            if QUOTA_MARKERS.iter().any(|m| lower.contains(m)) {
                warn!(ticker, notice, "Price API limit reached");
                return TrendResult::failed(TrendStatus::RateLimited);
            }
        }
    }

    if let Some(message) = payload.get(ERROR_KEY) {
        warn!(ticker, %message, "Invalid symbol");
        return TrendResult::failed(TrendStatus::InvalidSymbol);
    }

    warn!(ticker, %payload, "Unrecognized price API response");
    TrendResult::failed(TrendStatus::ApiError)
}

fn close_price(bar: &Value) -> Option<f64> {
    let close = bar.get(CLOSE_KEY)?;
    close
        .as_str()
        .and_then(|s| s.trim().parse().ok())
        .or_else(|| close.as_f64())
}
