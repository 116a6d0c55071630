pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::enrich::EnrichUseCase;
use crate::application::parsing::parser_for;
use crate::application::run_scan::{RunOutcome, RunScanUseCase, ScanOptions};
use crate::config::Settings;
use crate::domain::entities::report::MarketReport;
use crate::domain::error::DomainError;
use crate::domain::ports::analysis_model::AnalysisModel;
use crate::domain::ports::ledger::Ledger;
use crate::domain::ports::news_source::NewsSource;
use crate::domain::ports::pacer::Pacer;
use crate::domain::ports::price_history::PriceHistory;
use crate::domain::ports::report_delivery::ReportDelivery;
use crate::domain::values::response_format::ResponseFormat;
use crate::infrastructure::delivery::preview::FilePreviewDelivery;
use crate::infrastructure::delivery::smtp::SmtpDelivery;
use crate::infrastructure::ledger::file_ledger::FileLedger;
use crate::infrastructure::model::gemini::GeminiModel;
use crate::infrastructure::news::newsapi::NewsApiSource;
use crate::infrastructure::pacing::fixed_interval::FixedIntervalPacer;
use crate::infrastructure::prices::alpha_vantage::AlphaVantageSource;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Where a run's report goes.
#[derive(Debug, Clone)]
pub enum DeliveryMode {
    Email,
    /// Write the HTML to a file and leave the ledger untouched.
    Preview(PathBuf),
}

/// External collaborators for one [`MarketBrief`].
pub struct Collaborators {
    pub ledger: Arc<dyn Ledger>,
    pub news: Arc<dyn NewsSource>,
    pub model: Arc<dyn AnalysisModel>,
    /// `None` disables price enrichment.
    pub prices: Option<Arc<dyn PriceHistory>>,
    pub pacer: Arc<dyn Pacer>,
    pub delivery: Arc<dyn ReportDelivery>,
}

pub struct MarketBrief {
    scan_uc: RunScanUseCase,
}

impl MarketBrief {
    pub fn new(settings: &Settings, mode: DeliveryMode) -> Result<Self, DomainError> {
        let (delivery, record): (Arc<dyn ReportDelivery>, bool) = match mode {
            DeliveryMode::Email => (
                Arc::new(SmtpDelivery::new(&settings.smtp, &settings.recipients)?),
                true,
            ),
            DeliveryMode::Preview(path) => (Arc::new(FilePreviewDelivery::new(path)), false),
        };

        let prices: Option<Arc<dyn PriceHistory>> = match &settings.alpha_vantage_api_key {
            Some(key) => Some(Arc::new(AlphaVantageSource::new(key.clone()))),
            None => {
                warn!("ALPHA_VANTAGE_API_KEY not set, price trends disabled");
                None
            }
        };

        let collaborators = Collaborators {
            ledger: Arc::new(FileLedger::new(&settings.ledger_path)),
            news: Arc::new(NewsApiSource::new(settings.news_api_key.clone())),
            model: Arc::new(GeminiModel::new(
                settings.gemini_api_key.clone(),
                settings.gemini_model.clone(),
            )),
            prices,
            pacer: Arc::new(FixedIntervalPacer::new(settings.pacing)),
            delivery,
        };

        Ok(Self::with_providers(
            collaborators,
            settings.format,
            ScanOptions {
                keywords: settings.keywords.clone(),
                record,
            },
        ))
    }

    pub fn with_providers(
        collaborators: Collaborators,
        format: ResponseFormat,
        options: ScanOptions,
    ) -> Self {
        let enricher = collaborators
            .prices
            .map(|prices| EnrichUseCase::new(prices, collaborators.pacer));

        Self {
            scan_uc: RunScanUseCase::new(
                collaborators.ledger,
                collaborators.news,
                collaborators.model,
                parser_for(format),
                enricher,
                collaborators.delivery,
                options,
            ),
        }
    }

    /// One scan run dated today (local time).
    pub async fn run(&self) -> Result<RunOutcome, DomainError> {
        self.run_on(Local::now().date_naive()).await
    }

    pub async fn run_on(&self, today: NaiveDate) -> Result<RunOutcome, DomainError> {
        self.scan_uc.execute(today).await
    }

    /// Parse a saved model response without running a scan.
    pub fn parse_response(raw: &str, format: ResponseFormat) -> Result<MarketReport, DomainError> {
        parser_for(format).parse(raw)
    }
}
