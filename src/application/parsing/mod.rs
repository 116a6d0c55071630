pub mod free_text;
pub mod structured;

use crate::domain::ports::report_parser::ReportParser;
use crate::domain::values::response_format::ResponseFormat;
use std::sync::Arc;

pub use free_text::FreeTextParser;
pub use structured::StructuredParser;

/// Parser strategy for a configured response format.
pub fn parser_for(format: ResponseFormat) -> Arc<dyn ReportParser> {
    match format {
        ResponseFormat::FreeText => Arc::new(FreeTextParser),
        ResponseFormat::Json => Arc::new(StructuredParser),
    }
}
