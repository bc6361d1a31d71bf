// Common traits and types
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod account_identity;
mod alert;
mod alert_publisher;
mod audit;
mod bucket;
mod bucket_lister;
mod client_config;
mod region;

pub use account_identity::*;
pub use alert::*;
pub use alert_publisher::*;
pub use audit::*;
pub use bucket::*;
pub use bucket_lister::*;
pub use client_config::*;
pub use region::*;
