use async_trait::async_trait;

use crate::domain::error::DomainError;

/// Produces a time-limited public URL for an object-storage path.
#[async_trait]
pub trait ImageSigner: Send + Sync {
    async fn sign(&self, path: &str) -> Result<String, DomainError>;
}
