// Definition of a bucket
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use chrono::{
    DateTime,
    Utc,
};

/// Represents an S3 bucket as returned by `ListBuckets`.
///
/// This will always have a `name`. The `creation_date` is informational and
/// plays no part in the audit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bucket {
    /// Name of the bucket, unique within the account.
    pub name: String,

    /// When the bucket was created, if S3 told us.
    pub creation_date: Option<DateTime<Utc>>,
}

impl Bucket {
    /// Return a `Bucket` with the given `name` and no creation date.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:          name.into(),
            creation_date: None,
        }
    }
}

/// Convenience type for a list of `Bucket`, kept in listing order.
pub type Buckets = Vec<Bucket>;
