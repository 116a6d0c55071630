use crate::domain::error::DomainError;
use crate::domain::ports::report_delivery::ReportDelivery;
use std::path::PathBuf;
use tracing::info;

/// Writes the rendered report to a local HTML file instead of mailing it.
pub struct FilePreviewDelivery {
    path: PathBuf,
}

impl FilePreviewDelivery {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ReportDelivery for FilePreviewDelivery {
    async fn deliver(&self, subject: &str, html: &str) -> Result<(), DomainError> {
        tokio::fs::write(&self.path, html).await.map_err(|e| {
            DomainError::Delivery(format!("cannot write {}: {e}", self.path.display()))
        })?;
        info!(subject, path = %self.path.display(), "Wrote report preview");
        Ok(())
    }

    fn name(&self) -> &str {
        "preview"
    }
}
