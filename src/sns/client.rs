// Implements the SNS Client
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::{
    Context,
    Result,
};
use aws_sdk_sns::client::Client as SnsClient;
use aws_types::SdkConfig;
use crate::common::AlertMessage;
use tracing::debug;

/// The SNS `Client`.
pub struct Client {
    /// The AWS SDK `SnsClient`.
    pub client: SnsClient,
}

impl Client {
    /// Return a new SNS `Client` for the given shared config.
    pub fn new(sdk_config: &SdkConfig) -> Self {
        debug!("new: Creating SnsClient");

        Self {
            client: SnsClient::new(sdk_config),
        }
    }

    /// Publish `message` to `topic_arn`, returning the SNS message ID.
    pub async fn publish(
        &self,
        topic_arn: &str,
        message:   &AlertMessage,
    ) -> Result<String> {
        debug!("publish: Publishing '{}' to '{}'", message.subject, topic_arn);

        let output = self.client.publish()
            .topic_arn(topic_arn)
            .subject(&message.subject)
            .message(&message.body)
            .send()
            .await
            .with_context(|| format!("Publish failed for '{}'", topic_arn))?;

        let message_id = output.message_id()
            .with_context(|| format!("Publish to '{}' returned no MessageId", topic_arn))?;

        Ok(message_id.to_string())
    }
}
