// Storage capability traits
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::Result;
use async_trait::async_trait;
use super::Buckets;

/// `BucketLister` lists every bucket owned by the account.
#[async_trait]
pub trait BucketLister: Send + Sync {
    /// Returns all buckets visible to the account, in listing order.
    async fn buckets(&self) -> Result<Buckets>;
}

/// `EncryptionChecker` answers whether a bucket has a server side encryption
/// configuration.
///
/// Implementations must only return `Ok(false)` when the storage service
/// positively reports that no configuration exists. Every other failure is an
/// `Err`, since guessing would produce false alerts.
#[async_trait]
pub trait EncryptionChecker: Send + Sync {
    /// Returns whether `bucket` has server side encryption configured.
    async fn is_encrypted(&self, bucket: &str) -> Result<bool>;
}
