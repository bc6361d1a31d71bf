// The encryption audit
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::{
    Context,
    Result,
};
use futures::stream::{
    self,
    StreamExt,
};
use super::{
    compose,
    publish,
    AccountIdentity,
    AlertMessage,
    AlertPublisher,
    BucketLister,
    Buckets,
    ClientConfig,
    EncryptionChecker,
    PublishOutcome,
    PublishReport,
};
use tracing::{
    debug,
    info,
    warn,
};

/// A bucket whose encryption status couldn't be determined.
#[derive(Debug)]
pub struct CheckFailure {
    /// Name of the bucket.
    pub bucket: String,

    /// Why the check failed.
    pub error: anyhow::Error,
}

/// How an audit run finished.
///
/// Every variant carries the checks that failed, since those buckets are
/// neither known to be encrypted nor reported in the alert.
#[derive(Debug)]
pub enum AuditOutcome {
    /// No unencrypted buckets were found. Nothing was published.
    NoFindings {
        /// Number of buckets that were listed.
        checked: usize,

        /// Buckets whose check failed.
        failed_checks: Vec<CheckFailure>,
    },

    /// Unencrypted buckets were found, but there was nowhere to send the
    /// alert.
    NoDestinationsConfigured {
        /// Unencrypted buckets, in listing order.
        unencrypted: Buckets,

        /// The alert that would have been sent.
        message: AlertMessage,

        /// Buckets whose check failed.
        failed_checks: Vec<CheckFailure>,
    },

    /// Unencrypted buckets were found and publishing was skipped on request.
    DryRun {
        /// Unencrypted buckets, in listing order.
        unencrypted: Buckets,

        /// The alert that would have been sent.
        message: AlertMessage,

        /// Buckets whose check failed.
        failed_checks: Vec<CheckFailure>,
    },

    /// Unencrypted buckets were found and every topic was attempted.
    Published {
        /// Unencrypted buckets, in listing order.
        unencrypted: Buckets,

        /// The alert that was sent.
        message: AlertMessage,

        /// Per topic results.
        report: PublishReport,

        /// Buckets whose check failed.
        failed_checks: Vec<CheckFailure>,
    },
}

impl AuditOutcome {
    /// Buckets whose encryption check failed during the run.
    pub fn failed_checks(&self) -> &[CheckFailure] {
        match self {
            Self::NoFindings { failed_checks, .. }               => failed_checks,
            Self::NoDestinationsConfigured { failed_checks, .. } => failed_checks,
            Self::DryRun { failed_checks, .. }                   => failed_checks,
            Self::Published { failed_checks, .. }                => failed_checks,
        }
    }

    /// True if the audit passed: nothing unencrypted and every check ran.
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::NoFindings { .. })
            && self.failed_checks().is_empty()
    }
}

/// Runs the audit against the injected storage, identity and messaging
/// clients.
pub struct Auditor<S, I, P> {
    storage:   S,
    identity:  I,
    publisher: P,
}

impl<S, I, P> Auditor<S, I, P>
where
    S: BucketLister + EncryptionChecker,
    I: AccountIdentity,
    P: AlertPublisher,
{
    /// Return a new `Auditor` using the given clients.
    pub fn new(storage: S, identity: I, publisher: P) -> Self {
        Self {
            storage,
            identity,
            publisher,
        }
    }

    /// Check every bucket and alert on the unencrypted ones.
    ///
    /// Failing to list buckets or to resolve the account ID aborts the run,
    /// no partial alert is sent in that case. A failed check for a single
    /// bucket is recorded in the outcome and the run carries on.
    pub async fn run(&self, config: &ClientConfig) -> Result<AuditOutcome> {
        let buckets = self.storage.buckets()
            .await
            .context("Failed to list buckets")?;

        info!("run: Checking encryption on {} bucket(s)", buckets.len());

        let checked = buckets.len();
        let (unencrypted, failed_checks) = self.unencrypted_buckets(
            buckets,
            config.concurrency,
        ).await;

        if unencrypted.is_empty() {
            info!("run: No unencrypted buckets found");

            return Ok(AuditOutcome::NoFindings {
                checked,
                failed_checks,
            });
        }

        info!("run: Found {} unencrypted bucket(s)", unencrypted.len());

        let account_id = self.identity.account_id()
            .await
            .context("Failed to resolve account ID")?;

        let message = compose(&unencrypted, &account_id, &config.alert)?;

        if config.dry_run {
            info!("run: Dry run, not publishing");

            return Ok(AuditOutcome::DryRun {
                unencrypted,
                message,
                failed_checks,
            });
        }

        let outcome = match publish(&self.publisher, &message, &config.topics).await {
            PublishOutcome::NoDestinationsConfigured => {
                AuditOutcome::NoDestinationsConfigured {
                    unencrypted,
                    message,
                    failed_checks,
                }
            },
            PublishOutcome::Published(report) => {
                AuditOutcome::Published {
                    unencrypted,
                    message,
                    report,
                    failed_checks,
                }
            },
        };

        Ok(outcome)
    }

    // Checks run concurrently, at most `concurrency` at once. `buffered`
    // yields results in the order the buckets were listed, so the returned
    // set keeps listing order.
    async fn unencrypted_buckets(
        &self,
        buckets:     Buckets,
        concurrency: usize,
    ) -> (Buckets, Vec<CheckFailure>) {
        let checks = buckets.into_iter().map(|bucket| async move {
            let result = self.storage.is_encrypted(&bucket.name).await;

            (bucket, result)
        });

        let results: Vec<_> = stream::iter(checks)
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let mut unencrypted   = Buckets::new();
        let mut failed_checks = Vec::new();

        for (bucket, result) in results {
            match result {
                Ok(true) => {
                    debug!("'{}' is encrypted", bucket.name);
                },
                Ok(false) => {
                    debug!("'{}' is not encrypted", bucket.name);

                    unencrypted.push(bucket);
                },
                Err(error) => {
                    warn!("Failed to check '{}': {:#}", bucket.name, error);

                    failed_checks.push(CheckFailure {
                        bucket: bucket.name,
                        error,
                    });
                },
            }
        }

        (unencrypted, failed_checks)
    }
}
