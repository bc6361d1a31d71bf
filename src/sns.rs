// Imports all of the components needed for sns::client
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Implementation of the `AlertPublisher` trait for our SNS `Client`.
mod alert_publisher;

/// SNS `Client`.
mod client;

pub use client::*;
