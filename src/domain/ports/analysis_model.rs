use crate::domain::error::DomainError;
use crate::domain::values::response_format::ResponseFormat;

/// Text-in, text-out generative model.
#[async_trait::async_trait]
pub trait AnalysisModel: Send + Sync {
    /// Raw response text for `prompt`. `format` lets the backend switch on
    /// a native JSON mode when one exists.
    async fn generate(&self, prompt: &str, format: ResponseFormat) -> Result<String, DomainError>;
}
