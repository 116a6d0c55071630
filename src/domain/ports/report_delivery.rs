use crate::domain::error::DomainError;

#[async_trait::async_trait]
pub trait ReportDelivery: Send + Sync {
    /// Deliver a rendered HTML report. Implementations do not retry.
    async fn deliver(&self, subject: &str, html: &str) -> Result<(), DomainError>;

    fn name(&self) -> &str;
}
