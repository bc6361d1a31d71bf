// Implements the STS Client
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::{
    Context,
    Result,
};
use async_trait::async_trait;
use aws_sdk_sts::client::Client as StsClient;
use aws_types::SdkConfig;
use crate::common::AccountIdentity;
use tracing::debug;

/// The STS `Client`.
pub struct Client {
    /// The AWS SDK `StsClient`.
    pub client: StsClient,
}

impl Client {
    /// Return a new STS `Client` for the given shared config.
    pub fn new(sdk_config: &SdkConfig) -> Self {
        debug!("new: Creating StsClient");

        Self {
            client: StsClient::new(sdk_config),
        }
    }
}

#[async_trait]
impl AccountIdentity for Client {
    /// Return the account ID from `GetCallerIdentity`.
    async fn account_id(&self) -> Result<String> {
        let output = self.client.get_caller_identity()
            .send()
            .await
            .context("GetCallerIdentity failed")?;

        debug!("account_id: Caller is {:?}", output.arn());

        let account = output.account()
            .context("GetCallerIdentity returned no Account")?;

        Ok(account.to_string())
    }
}
