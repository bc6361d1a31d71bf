// Alert message composition
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::{
    bail,
    Result,
};
use super::Bucket;
use tracing::debug;

/// Subject used when no override is configured.
pub const DEFAULT_SUBJECT: &str = "ALERT:  Unencrypted s3 buckets found";

/// Explanatory text that opens the alert body when no override is configured.
pub const DEFAULT_MESSAGE_PREFIX: &str = "The s3 buckets specified below do \
    not have a server side encryption configuration. Please review and \
    correct the configuration if required.";

// SNS rejects subjects longer than this.
const MAX_SUBJECT_LENGTH: usize = 100;

/// Optional overrides for the composed alert.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AlertOptions {
    /// Replaces `DEFAULT_SUBJECT`.
    pub subject: Option<String>,

    /// Replaces `DEFAULT_MESSAGE_PREFIX`. The account and bucket lines are
    /// always appended after it.
    pub message_prefix: Option<String>,
}

/// The alert that gets published to every configured topic.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AlertMessage {
    /// Subject line, used by email subscribers.
    pub subject: String,

    /// Free text body.
    pub body: String,
}

/// Build the `AlertMessage` for the given `unencrypted` buckets.
///
/// The body is the message prefix, a blank line, the account ID and then one
/// line per bucket in the order given:
///
/// ```text
/// The s3 buckets specified below do not have ...
///
/// Account ID:  123456789012
///     Bucket Name:  some-bucket
/// ```
///
/// Composing an alert for no buckets is an error, callers are expected to
/// stop before getting here.
pub fn compose(
    unencrypted: &[Bucket],
    account_id:  &str,
    options:     &AlertOptions,
) -> Result<AlertMessage> {
    if unencrypted.is_empty() {
        bail!("Refusing to compose an alert with no unencrypted buckets");
    }

    debug!(
        "compose: {} unencrypted bucket(s) in account '{}'",
        unencrypted.len(),
        account_id,
    );

    let subject = options.subject
        .as_deref()
        .unwrap_or(DEFAULT_SUBJECT)
        .to_string();

    let prefix = options.message_prefix
        .as_deref()
        .unwrap_or(DEFAULT_MESSAGE_PREFIX);

    let mut body = format!("{}\n\nAccount ID:  {}", prefix, account_id);

    for bucket in unencrypted {
        body.push_str("\n\tBucket Name:  ");
        body.push_str(&bucket.name);
    }

    Ok(AlertMessage {
        subject,
        body,
    })
}

/// Ensures that a subject override is something SNS will accept.
///
/// Subjects must be non-empty printable ASCII, at most 100 characters long.
pub fn is_valid_subject(subject: &str) -> Result<String, String> {
    if subject.trim().is_empty() {
        return Err("subject must not be empty".into());
    }

    if subject.chars().count() > MAX_SUBJECT_LENGTH {
        return Err(format!(
            "subject must be at most {} characters",
            MAX_SUBJECT_LENGTH,
        ));
    }

    if subject.chars().any(char::is_control) {
        return Err("subject must not contain control characters".into());
    }

    if !subject.is_ascii() {
        return Err("subject must be printable ASCII".into());
    }

    Ok(subject.to_string())
}
