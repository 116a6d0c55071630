//! Shared test helpers: in-memory fakes for every external collaborator.

#![allow(dead_code)]

use marketbrief::application::run_scan::ScanOptions;
use marketbrief::domain::entities::article::ArticleRef;
use marketbrief::domain::error::DomainError;
use marketbrief::domain::ports::analysis_model::AnalysisModel;
use marketbrief::domain::ports::news_source::NewsSource;
use marketbrief::domain::ports::pacer::Pacer;
use marketbrief::domain::ports::price_history::PriceHistory;
use marketbrief::domain::ports::report_delivery::ReportDelivery;
use marketbrief::domain::values::response_format::ResponseFormat;
use marketbrief::infrastructure::ledger::file_ledger::FileLedger;
use marketbrief::{Collaborators, MarketBrief};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const FREE_TEXT_RESPONSE: &str = "\
**Overall Market Overview:**
Market Sentiment: Bullish. Tech leads gains on strong earnings.

**Short-Term Opportunities (1-6 months):**
* **NVIDIA (NVDA):** Data-center demand keeps beating estimates.
* **Acme Robotics (Private Company):** Raised a large Series C.

**Long-Term Potential (1+ years):**
* **Microsoft (MSFT):** Cloud and AI services compound revenue.
";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

pub fn article(url: &str) -> ArticleRef {
    ArticleRef::new(url, format!("Headline for {url}"), "Some description.", "Wire")
}

pub fn articles(urls: &[&str]) -> Vec<ArticleRef> {
    urls.iter().map(|u| article(u)).collect()
}

/// News source that returns the same batch on every call.
pub struct FakeNews {
    result: Result<Vec<ArticleRef>, String>,
}

impl FakeNews {
    pub fn returning(articles: Vec<ArticleRef>) -> Self {
        Self { result: Ok(articles) }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl NewsSource for FakeNews {
    async fn fetch(&self, _keywords: &[String]) -> Result<Vec<ArticleRef>, DomainError> {
        self.result.clone().map_err(DomainError::News)
    }
}

/// Model that replies with a fixed response and counts prompts.
pub struct FakeModel {
    response: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn replying(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl AnalysisModel for FakeModel {
    async fn generate(&self, prompt: &str, _format: ResponseFormat) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response.clone().map_err(DomainError::Model)
    }
}

/// Price source with scripted payloads per ticker. Unscripted tickers get
/// a short successful series.
#[derive(Default)]
pub struct CountingPrices {
    scripted: HashMap<String, Result<Value, String>>,
    /// Once this many calls were made, every later call returns a quota notice.
    quota: Option<usize>,
    pub calls: Mutex<Vec<String>>,
}

impl CountingPrices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(mut self, calls: usize) -> Self {
        self.quota = Some(calls);
        self
    }

    pub fn script(mut self, ticker: &str, payload: Result<Value, String>) -> Self {
        self.scripted.insert(ticker.to_string(), payload);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn series(closes: &[f64]) -> Value {
    let days: serde_json::Map<String, Value> = closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            (
                format!("2024-02-{:02}", i + 1),
                json!({ "4. close": close.to_string() }),
            )
        })
        .collect();
    json!({ "Meta Data": {}, "Time Series (Daily)": days })
}

pub fn quota_notice() -> Value {
    json!({ "Information": "Our standard API rate limit is 25 requests per day." })
}

#[async_trait::async_trait]
impl PriceHistory for CountingPrices {
    async fn daily_series(&self, ticker: &str) -> Result<Value, String> {
        let made = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(ticker.to_string());
            calls.len()
        };
        if self.quota.is_some_and(|quota| made > quota) {
            return Ok(quota_notice());
        }
        match self.scripted.get(ticker) {
            Some(payload) => payload.clone(),
            None => Ok(series(&[100.0, 101.0, 103.0])),
        }
    }
}

#[derive(Default)]
pub struct CountingPacer {
    pauses: AtomicUsize,
}

impl CountingPacer {
    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Pacer for CountingPacer {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

/// Delivery channel that keeps every message it was handed.
#[derive(Default)]
pub struct RecordingDelivery {
    fail: bool,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingDelivery {
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_html(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, html)| html.clone())
    }
}

#[async_trait::async_trait]
impl ReportDelivery for RecordingDelivery {
    async fn deliver(&self, subject: &str, html: &str) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::Delivery("connection refused".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), html.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// A scan wired to fakes and a ledger file in a temp directory.
pub struct Harness {
    pub dir: TempDir,
    pub ledger_path: PathBuf,
    pub model: Arc<FakeModel>,
    pub prices: Arc<CountingPrices>,
    pub pacer: Arc<CountingPacer>,
    pub delivery: Arc<RecordingDelivery>,
    pub brief: MarketBrief,
}

pub struct HarnessBuilder {
    news: FakeNews,
    model: FakeModel,
    prices: CountingPrices,
    delivery: RecordingDelivery,
    format: ResponseFormat,
    record: bool,
}

impl HarnessBuilder {
    pub fn new(news: FakeNews, model: FakeModel) -> Self {
        Self {
            news,
            model,
            prices: CountingPrices::new(),
            delivery: RecordingDelivery::default(),
            format: ResponseFormat::FreeText,
            record: true,
        }
    }

    pub fn prices(mut self, prices: CountingPrices) -> Self {
        self.prices = prices;
        self
    }

    pub fn delivery(mut self, delivery: RecordingDelivery) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn record(mut self, record: bool) -> Self {
        self.record = record;
        self
    }

    pub fn build(self) -> Harness {
        let dir = TempDir::new().unwrap();
        let ledger_path = dir.path().join("processed_articles.txt");
        self.build_in(dir, ledger_path)
    }

    /// Build against an existing directory and ledger file.
    pub fn build_in(self, dir: TempDir, ledger_path: PathBuf) -> Harness {
        let model = Arc::new(self.model);
        let prices = Arc::new(self.prices);
        let pacer = Arc::new(CountingPacer::default());
        let delivery = Arc::new(self.delivery);

        let brief = MarketBrief::with_providers(
            Collaborators {
                ledger: Arc::new(FileLedger::new(&ledger_path)),
                news: Arc::new(self.news),
                model: model.clone(),
                prices: Some(prices.clone()),
                pacer: pacer.clone(),
                delivery: delivery.clone(),
            },
            self.format,
            ScanOptions {
                keywords: vec!["stock market".into()],
                record: self.record,
            },
        );

        Harness {
            dir,
            ledger_path,
            model,
            prices,
            pacer,
            delivery,
            brief,
        }
    }
}

impl Harness {
    pub fn ledger_lines(&self) -> Vec<String> {
        match std::fs::read_to_string(&self.ledger_path) {
            Ok(text) => text.lines().map(String::from).collect(),
            Err(_) => Vec::new(),
        }
    }
}
