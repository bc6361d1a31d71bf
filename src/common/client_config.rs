// ClientConfig
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use aws_config::meta::region::RegionProviderChain;
use aws_types::SdkConfig;
use super::{
    AlertOptions,
    Region,
};
use tracing::debug;

/// Number of bucket encryption checks that may be in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Client configuration.
#[derive(Debug)]
pub struct ClientConfig {
    /// The region that our AWS clients should be created in.
    pub region: Region,

    /// Topic ARNs that the alert is published to.
    ///
    /// If this is empty, unencrypted buckets are still reported but no alert
    /// can be delivered.
    pub topics: Vec<String>,

    /// Overrides for the alert subject and message prefix.
    pub alert: AlertOptions,

    /// Maximum number of concurrent bucket encryption checks.
    pub concurrency: usize,

    /// Compose the alert but don't publish it.
    pub dry_run: bool,
}

impl Default for ClientConfig {
    /// Returns a default `ClientConfig`.
    ///
    /// ```rust
    /// ClientConfig {
    ///     region:      Region::new(),
    ///     topics:      Vec::new(),
    ///     alert:       AlertOptions::default(),
    ///     concurrency: DEFAULT_CONCURRENCY,
    ///     dry_run:     false,
    /// }
    /// ```
    fn default() -> Self {
        Self {
            region:      Region::new(),
            topics:      Vec::new(),
            alert:       AlertOptions::default(),
            concurrency: DEFAULT_CONCURRENCY,
            dry_run:     false,
        }
    }
}

impl ClientConfig {
    // Our region, if we have one, then the SDK's own chain of environment,
    // profile and instance metadata.
    fn region_provider(&self) -> RegionProviderChain {
        RegionProviderChain::first_try(self.region.clone())
            .or_default_provider()
    }

    /// Load the shared AWS configuration for our `region`.
    ///
    /// Credentials come from the usual environment, profile and instance
    /// metadata chain. The S3, SNS and STS clients are all built from this.
    pub async fn sdk_config(&self) -> SdkConfig {
        debug!("sdk_config: Loading AWS config for region '{}'", self.region.name());

        aws_config::from_env()
            .region(self.region_provider())
            .load()
            .await
    }
}
