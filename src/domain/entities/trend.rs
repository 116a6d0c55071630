use crate::domain::values::trend_status::TrendStatus;
use serde::Serialize;

/// Short price history for one ticker. `prices` is oldest first and only
/// present on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    pub prices: Option<Vec<f64>>,
    pub status: TrendStatus,
}

impl TrendResult {
    pub fn success(prices: Vec<f64>) -> Self {
        Self {
            prices: Some(prices),
            status: TrendStatus::Success,
        }
    }

    pub fn failed(status: TrendStatus) -> Self {
        Self {
            prices: None,
            status,
        }
    }
}
