use crate::domain::ports::pacer::Pacer;
use std::time::Duration;
use tracing::info;

/// Waits a fixed interval on every call. A zero interval never sleeps.
pub struct FixedIntervalPacer {
    interval: Duration,
}

impl FixedIntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait::async_trait]
impl Pacer for FixedIntervalPacer {
    async fn pause(&self) {
        if self.interval.is_zero() {
            return;
        }
        info!(seconds = self.interval.as_secs_f64(), "Pausing to respect price API rate limits");
        tokio::time::sleep(self.interval).await;
    }
}
