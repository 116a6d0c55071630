use crate::domain::entities::report::{Horizon, MarketReport, Opportunity, ReportSection};
use crate::domain::error::DomainError;
use crate::domain::ports::report_parser::ReportParser;
use crate::domain::values::response_format::ResponseFormat;
use crate::domain::values::sentiment::Sentiment;
use crate::domain::values::ticker;
use serde::Deserialize;
use tracing::error;

/// Parser for the JSON object the model is asked to emit in
/// [`ResponseFormat::Json`] mode. Undecodable input is an error: there is
/// no prose to fall back on.
pub struct StructuredParser;

#[derive(Debug, Deserialize)]
struct RawReport {
    #[serde(default)]
    market_overview: Option<String>,
    #[serde(default)]
    overall_sentiment: Option<String>,
    #[serde(default)]
    opportunities: Option<Vec<RawOpportunity>>,
}

#[derive(Debug, Deserialize)]
struct RawOpportunity {
    company_name: String,
    #[serde(default)]
    ticker_symbol: Option<String>,
    #[serde(default)]
    justification: Option<String>,
    #[serde(default)]
    sentiment: Option<String>,
}

impl ReportParser for StructuredParser {
    fn format(&self) -> ResponseFormat {
        ResponseFormat::Json
    }

    fn parse(&self, raw: &str) -> Result<MarketReport, DomainError> {
        let body = strip_code_fence(raw);
        let decoded: RawReport = serde_json::from_str(body).map_err(|e| {
            error!(error = %e, raw, "Model response is not valid report JSON");
            DomainError::Parse(format!("invalid report JSON: {e}"))
        })?;

        let opportunities = decoded
            .opportunities
            .unwrap_or_default()
            .into_iter()
            .map(|o| {
                Opportunity::new(
                    o.company_name.trim(),
                    ticker::normalize(o.ticker_symbol.as_deref()),
                    o.justification.unwrap_or_default().trim(),
                )
                .with_sentiment(o.sentiment.and_then(|s| s.parse().ok()))
            })
            .collect();

        Ok(MarketReport::new(
            decoded.market_overview.unwrap_or_default().trim(),
            decoded
                .overall_sentiment
                .as_deref()
                .map(Sentiment::parse_lenient)
                .unwrap_or_default(),
            vec![ReportSection::new(Horizon::Unspecified, opportunities)],
        ))
    }
}

/// Models often wrap JSON in a ```json fence even when told not to.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
