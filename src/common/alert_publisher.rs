// Messaging capability trait and topic fan-out
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::Result;
use async_trait::async_trait;
use futures::future;
use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::fmt;
use super::AlertMessage;
use tracing::{
    debug,
    info,
    warn,
};

/// Confirmation returned by the messaging service for a single publish.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Receipt {
    /// The message ID assigned by the messaging service.
    pub message_id: String,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message_id)
    }
}

/// `AlertPublisher` sends an `AlertMessage` to a single topic.
#[async_trait]
pub trait AlertPublisher: Send + Sync {
    /// Publish `message` to `topic`, returning the service's `Receipt`.
    async fn publish_to(
        &self,
        topic:   &str,
        message: &AlertMessage,
    ) -> Result<Receipt>;
}

/// Per topic results of a fan-out, keyed by topic.
#[derive(Debug, Default)]
pub struct PublishReport(pub BTreeMap<String, Result<Receipt>>);

impl PublishReport {
    /// Returns the receipt for `topic`, if publishing to it succeeded.
    pub fn receipt(&self, topic: &str) -> Option<&Receipt> {
        self.0.get(topic).and_then(|result| result.as_ref().ok())
    }

    /// Returns the topics that failed, along with their errors.
    pub fn failures(&self) -> Vec<(&str, &anyhow::Error)> {
        self.0.iter()
            .filter_map(|(topic, result)| {
                result.as_ref().err().map(|e| (topic.as_str(), e))
            })
            .collect()
    }

    /// True if every topic accepted the message.
    pub fn is_complete(&self) -> bool {
        self.0.values().all(Result::is_ok)
    }
}

/// The result of attempting to deliver an alert.
#[derive(Debug)]
pub enum PublishOutcome {
    /// There were no topics to send to.
    NoDestinationsConfigured,

    /// Every topic was attempted. Individual failures are in the report.
    Published(PublishReport),
}

/// Publish `message` to every topic in `topics`.
///
/// Topics are independent, so they're published to concurrently and a
/// failure on one never prevents an attempt on the others. Duplicate topics
/// are only published to once.
pub async fn publish<P>(
    publisher: &P,
    message:   &AlertMessage,
    topics:    &[String],
) -> PublishOutcome
where
    P: AlertPublisher + ?Sized,
{
    if topics.is_empty() {
        warn!("publish: No topics configured, alert will not be sent");

        return PublishOutcome::NoDestinationsConfigured;
    }

    let topics: BTreeSet<&str> = topics.iter()
        .map(String::as_str)
        .collect();

    debug!("publish: Publishing to {} topic(s)", topics.len());

    let attempts = topics.into_iter().map(|topic| async move {
        let result = publisher.publish_to(topic, message).await;

        match &result {
            Ok(receipt) => info!(
                "publish: Published to '{}' with message ID '{}'",
                topic,
                receipt,
            ),
            Err(e) => warn!("publish: Failed to publish to '{}': {:#}", topic, e),
        }

        (topic.to_string(), result)
    });

    let results = future::join_all(attempts).await;

    PublishOutcome::Published(PublishReport(results.into_iter().collect()))
}
