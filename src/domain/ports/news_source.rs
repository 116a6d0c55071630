use crate::domain::entities::article::ArticleRef;
use crate::domain::error::DomainError;

#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    /// Articles matching any of `keywords`, newest first.
    async fn fetch(&self, keywords: &[String]) -> Result<Vec<ArticleRef>, DomainError>;
}
