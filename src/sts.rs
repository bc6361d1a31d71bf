// Imports all of the components needed for sts::client
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// STS `Client`, implementing the `AccountIdentity` trait.
mod client;

pub use client::*;
