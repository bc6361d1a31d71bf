// Implement the storage traits for the s3::Client
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::Result;
use async_trait::async_trait;
use crate::common::{
    BucketLister,
    Buckets,
    EncryptionChecker,
};
use super::client::Client;
use tracing::debug;

#[async_trait]
impl BucketLister for Client {
    /// Return every `Bucket` owned by the account.
    async fn buckets(&self) -> Result<Buckets> {
        debug!("buckets: Listing...");

        let buckets = self.list_buckets().await?;

        debug!("buckets: Found {} bucket(s)", buckets.len());

        Ok(buckets)
    }
}

#[async_trait]
impl EncryptionChecker for Client {
    /// Return whether `bucket` has a server side encryption configuration.
    async fn is_encrypted(&self, bucket: &str) -> Result<bool> {
        let encryption = self.get_bucket_encryption(bucket).await?;

        if let Some(output) = &encryption {
            debug!(
                "is_encrypted: '{}' has configuration {:?}",
                bucket,
                output.server_side_encryption_configuration(),
            );
        }

        Ok(encryption.is_some())
    }
}
