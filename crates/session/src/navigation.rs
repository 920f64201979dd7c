//! Navigation side effect

use async_trait::async_trait;

/// Performs a redirect to an application path.
///
/// Session transitions await the returned future before completing.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Redirect to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect cannot be performed.
    async fn navigate(&self, path: &str) -> anyhow::Result<()>;
}
