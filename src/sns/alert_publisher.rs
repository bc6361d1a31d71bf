// Implement the AlertPublisher trait for the sns::Client
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::Result;
use async_trait::async_trait;
use crate::common::{
    AlertMessage,
    AlertPublisher,
    Receipt,
};
use super::client::Client;

#[async_trait]
impl AlertPublisher for Client {
    /// Publish `message` to the SNS topic ARN `topic`.
    async fn publish_to(
        &self,
        topic:   &str,
        message: &AlertMessage,
    ) -> Result<Receipt> {
        let message_id = self.publish(topic, message).await?;

        Ok(Receipt {
            message_id,
        })
    }
}
