use crate::domain::values::sentiment::Sentiment;
use serde::Serialize;
use std::fmt;

/// Overview text used when the free-text response could not be parsed.
pub const PARSE_FAILURE_OVERVIEW: &str =
    "Could not parse the AI response. See the run log for the raw output.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    ShortTerm,
    LongTerm,
    Unspecified,
}

impl Horizon {
    pub fn title(&self) -> &'static str {
        match self {
            Horizon::ShortTerm => "Short-Term Opportunities",
            Horizon::LongTerm => "Long-Term Potential",
            Horizon::Unspecified => "Opportunities",
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A company the model flagged, with its reasoning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    pub company_name: String,
    /// `None` when the model gave no ticker. Placeholders such as
    /// "Private Company" stay as `Some`.
    pub ticker: Option<String>,
    pub justification: String,
    pub sentiment: Option<Sentiment>,
}

impl Opportunity {
    pub fn new(
        company_name: impl Into<String>,
        ticker: Option<String>,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            ticker,
            justification: justification.into(),
            sentiment: None,
        }
    }

    pub fn with_sentiment(mut self, sentiment: Option<Sentiment>) -> Self {
        self.sentiment = sentiment;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub horizon: Horizon,
    pub opportunities: Vec<Opportunity>,
}

impl ReportSection {
    pub fn new(horizon: Horizon, opportunities: Vec<Opportunity>) -> Self {
        Self {
            horizon,
            opportunities,
        }
    }
}

/// Normalised model output for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketReport {
    pub overview: String,
    pub sentiment: Sentiment,
    pub sections: Vec<ReportSection>,
    /// Set when the response could not be parsed and this is the
    /// placeholder report.
    pub degraded: bool,
}

impl MarketReport {
    pub fn new(overview: impl Into<String>, sentiment: Sentiment, sections: Vec<ReportSection>) -> Self {
        Self {
            overview: overview.into(),
            sentiment,
            sections,
            degraded: false,
        }
    }

    /// Empty short/long-term report flagged as unparseable.
    pub fn parse_failure() -> Self {
        Self {
            overview: PARSE_FAILURE_OVERVIEW.to_string(),
            sentiment: Sentiment::Neutral,
            sections: vec![
                ReportSection::new(Horizon::ShortTerm, vec![]),
                ReportSection::new(Horizon::LongTerm, vec![]),
            ],
            degraded: true,
        }
    }

    /// Every opportunity, in section order.
    pub fn opportunities(&self) -> impl Iterator<Item = &Opportunity> {
        self.sections.iter().flat_map(|s| s.opportunities.iter())
    }

    pub fn opportunity_count(&self) -> usize {
        self.sections.iter().map(|s| s.opportunities.len()).sum()
    }

    pub fn section(&self, horizon: Horizon) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.horizon == horizon)
    }

    pub fn short_term(&self) -> &[Opportunity] {
        self.section(Horizon::ShortTerm)
            .map(|s| s.opportunities.as_slice())
            .unwrap_or(&[])
    }

    pub fn long_term(&self) -> &[Opportunity] {
        self.section(Horizon::LongTerm)
            .map(|s| s.opportunities.as_slice())
            .unwrap_or(&[])
    }
}
