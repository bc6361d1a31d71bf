// Identity capability trait
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::Result;
use async_trait::async_trait;

/// `AccountIdentity` resolves the account that the credentials belong to.
#[async_trait]
pub trait AccountIdentity: Send + Sync {
    /// Returns the account ID of the caller.
    async fn account_id(&self) -> Result<String>;
}
