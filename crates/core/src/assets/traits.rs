use async_trait::async_trait;

use crate::errors::Result;

use super::model::Asset;

/// Resolves user-facing asset codes to full asset records.
///
/// The default implementation is the built-in catalog; applications with
/// their own instrument database supply their own implementation.
#[async_trait]
pub trait AssetRepositoryTrait: Send + Sync {
    /// Resolve a single code. Fails with a resolution error when the code
    /// is unknown.
    async fn resolve(&self, code: &str) -> Result<Asset>;

    /// All assets available for selection, in catalog order.
    async fn list(&self) -> Result<Vec<Asset>>;
}
