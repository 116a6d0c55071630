/// Delay policy applied between successive price lookups.
#[async_trait::async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}
