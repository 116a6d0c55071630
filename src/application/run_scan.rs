//! One scan run: ledger → news → model → parse → enrich → deliver → ledger.
//!
//! The ledger is only appended after the report was delivered. A crash or
//! failure anywhere earlier leaves it untouched and the same articles are
//! picked up again on the next run.

use crate::application::articles::{batch_urls, fresh_articles};
use crate::application::enrich::{EnrichUseCase, EnrichmentContext};
use crate::application::prompt::build_prompt;
use crate::application::render::{render_html, subject};
use crate::domain::error::DomainError;
use crate::domain::ports::analysis_model::AnalysisModel;
use crate::domain::ports::ledger::Ledger;
use crate::domain::ports::news_source::NewsSource;
use crate::domain::ports::report_delivery::ReportDelivery;
use crate::domain::ports::report_parser::ReportParser;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The news source returned nothing (or failed).
    NoArticles,
    /// Every fetched article was already in the ledger.
    NoNewArticles { fetched: usize },
    Delivered {
        articles: usize,
        opportunities: usize,
        price_lookups: usize,
        rate_limited: bool,
        degraded: bool,
        recorded: bool,
    },
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub keywords: Vec<String>,
    /// Append delivered URLs to the ledger. Off for preview runs.
    pub record: bool,
}

pub struct RunScanUseCase {
    ledger: Arc<dyn Ledger>,
    news: Arc<dyn NewsSource>,
    model: Arc<dyn AnalysisModel>,
    parser: Arc<dyn ReportParser>,
    enricher: Option<EnrichUseCase>,
    delivery: Arc<dyn ReportDelivery>,
    options: ScanOptions,
}

impl RunScanUseCase {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        news: Arc<dyn NewsSource>,
        model: Arc<dyn AnalysisModel>,
        parser: Arc<dyn ReportParser>,
        enricher: Option<EnrichUseCase>,
        delivery: Arc<dyn ReportDelivery>,
        options: ScanOptions,
    ) -> Self {
        Self {
            ledger,
            news,
            model,
            parser,
            enricher,
            delivery,
            options,
        }
    }

    pub async fn execute(&self, today: NaiveDate) -> Result<RunOutcome, DomainError> {
        let run_id = uuid::Uuid::new_v4();
        self.run(today)
            .instrument(info_span!("scan", %run_id, format = %self.parser.format()))
            .await
    }

    async fn run(&self, today: NaiveDate) -> Result<RunOutcome, DomainError> {
        let seen = self.ledger.load()?;
        info!(recorded = seen.len(), "Loaded article ledger");

        let all = match self.news.fetch(&self.options.keywords).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!(error = %e, "News fetch failed, treating as no articles");
                Vec::new()
            }
        };
        if all.is_empty() {
            info!("No articles fetched, nothing to do");
            return Ok(RunOutcome::NoArticles);
        }

        let fetched = all.len();
        let fresh = fresh_articles(all, &seen);
        if fresh.is_empty() {
            info!(fetched, "No new articles to analyze");
            return Ok(RunOutcome::NoNewArticles { fetched });
        }
        info!(fetched, new = fresh.len(), "Found new articles to analyze");

        let format = self.parser.format();
        let prompt = build_prompt(format, &fresh);
        let raw = self.model.generate(&prompt, format).await.map_err(|e| {
            error!(error = %e, articles = fresh.len(), "Model call failed, skipping report");
            e
        })?;
        if raw.trim().is_empty() {
            error!(articles = fresh.len(), "Model returned an empty response, skipping report");
            return Err(DomainError::Model("empty response".into()));
        }
        debug!(raw = %raw, "Raw model response");

        let report = self.parser.parse(&raw)?;
        info!(
            opportunities = report.opportunity_count(),
            sentiment = %report.sentiment,
            degraded = report.degraded,
            "Parsed model response"
        );

        let trends = match &self.enricher {
            Some(enricher) => enricher.execute(&report).await,
            None => EnrichmentContext::new(),
        };

        let html = render_html(&report, &trends, today);
        self.delivery
            .deliver(&subject(today), &html)
            .await
            .map_err(|e| {
                error!(error = %e, channel = self.delivery.name(), "Delivery failed, ledger not updated");
                e
            })?;
        info!(channel = self.delivery.name(), "Report delivered");

        if self.options.record {
            let urls = batch_urls(&fresh);
            self.ledger.append(&urls).map_err(|e| {
                error!(error = %e, urls = urls.len(), "Report was delivered but the ledger update failed; articles will be re-sent next run");
                e
            })?;
            info!(urls = urls.len(), "Recorded processed articles");
        }

        Ok(RunOutcome::Delivered {
            articles: fresh.len(),
            opportunities: report.opportunity_count(),
            price_lookups: trends.network_calls(),
            rate_limited: trends.is_rate_limited(),
            degraded: report.degraded,
            recorded: self.options.record,
        })
    }
}
