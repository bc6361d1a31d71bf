// Handles region things
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use aws_config::meta::region::future;
use aws_config::meta::region::ProvideRegion;
use aws_types::region;
use std::env;
use tracing::debug;

/// The AWS region our clients are created in.
///
/// If no region is found, `ClientConfig` falls through to the AWS SDK's own
/// region chain (profile, instance metadata).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    region: Option<region::Region>,
}

impl Region {
    /// Returns a `Region` taken from `AWS_REGION` or `AWS_DEFAULT_REGION`.
    pub fn new() -> Self {
        // This might be overridden later depending on CLI options.
        let possibilities = vec![
            env::var("AWS_REGION"),
            env::var("AWS_DEFAULT_REGION"),
        ];

        let region = possibilities
            .into_iter()
            .find_map(Result::ok)
            .filter(|region| !region.is_empty())
            .map(region::Region::new);

        debug!("Region in environment is: {:?}", region);

        Self {
            region,
        }
    }

    /// Returns the region name, or "default" if none was set.
    pub fn name(&self) -> &str {
        match &self.region {
            Some(region) => region.as_ref(),
            None         => "default",
        }
    }

    /// Set the region to `region`.
    pub fn set_region(mut self, region: &str) -> Self {
        debug!("Region set to: {:?}", region);

        self.region = Some(region::Region::new(region.to_string()));
        self
    }
}

impl ProvideRegion for Region {
    // None moves a RegionProviderChain on to its next provider.
    fn region(&self) -> future::ProvideRegion {
        future::ProvideRegion::ready(self.region.to_owned())
    }
}
