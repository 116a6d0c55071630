use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one price-history lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStatus {
    Success,
    PrivateOrNA,
    InvalidSymbol,
    RateLimited,
    NetworkError,
    ApiError,
}

impl fmt::Display for TrendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendStatus::Success => write!(f, "Success"),
            TrendStatus::PrivateOrNA => write!(f, "Private Company / N/A"),
            TrendStatus::InvalidSymbol => write!(f, "Invalid Symbol"),
            TrendStatus::RateLimited => write!(f, "Daily API Limit Reached"),
            TrendStatus::NetworkError => write!(f, "Network Error"),
            TrendStatus::ApiError => write!(f, "API Error"),
        }
    }
}
