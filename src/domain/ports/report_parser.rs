//! Parser port for model responses.
//!
//! The response format is chosen by configuration, so each format gets its
//! own [`ReportParser`] implementation and the orchestrator only sees the
//! trait. Adding a format means adding an implementation, nothing else.

use crate::domain::entities::report::MarketReport;
use crate::domain::error::DomainError;
use crate::domain::values::response_format::ResponseFormat;

pub trait ReportParser: Send + Sync {
    fn format(&self) -> ResponseFormat;

    /// Turn raw model output into a report.
    ///
    /// Implementations decide their own failure policy: the free-text
    /// parser never fails (it degrades to an empty report), the structured
    /// parser returns [`DomainError::Parse`] on undecodable input.
    fn parse(&self, raw: &str) -> Result<MarketReport, DomainError>;
}
