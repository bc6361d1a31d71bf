// s3enc: Alerts on AWS S3 buckets without server side encryption.
#![forbid(unsafe_code)]
use anyhow::Result;
use std::process::ExitCode;
use tracing::{
    error,
    warn,
};
use tracing_subscriber::EnvFilter;

mod cli;
mod common;
mod s3;
mod sns;
mod sts;

use common::{
    AuditOutcome,
    Auditor,
    CheckFailure,
};

// Unencrypted buckets were found but no topics were configured.
const EXIT_NO_DESTINATIONS: u8 = 2;

// Print the unencrypted buckets and the alert that was (or would have been)
// sent.
fn print_findings(outcome: &AuditOutcome) {
    let (unencrypted, message) = match outcome {
        AuditOutcome::NoFindings { checked, .. } => {
            println!("No unencrypted buckets found in {} bucket(s)", checked);
            return;
        },
        AuditOutcome::NoDestinationsConfigured { unencrypted, message, .. } => {
            (unencrypted, message)
        },
        AuditOutcome::DryRun { unencrypted, message, .. } => {
            (unencrypted, message)
        },
        AuditOutcome::Published { unencrypted, message, .. } => {
            (unencrypted, message)
        },
    };

    for bucket in unencrypted {
        println!("unencrypted\t{}", bucket.name);
    }

    if let AuditOutcome::Published { report, .. } = outcome {
        for (topic, result) in &report.0 {
            match result {
                Ok(receipt) => println!("published\t{}\t{}", topic, receipt),
                Err(e)      => println!("failed\t{}\t{:#}", topic, e),
            }
        }

        return;
    }

    println!("\nSubject: {}\n\n{}", message.subject, message.body);
}

fn print_failed_checks(failed_checks: &[CheckFailure]) {
    for failure in failed_checks {
        println!("unchecked\t{}\t{:#}", failure.bucket, failure.error);
    }
}

// Work out how we should exit. A failed check or publish always wins, since
// that means the audit itself is incomplete.
fn exit_code(outcome: &AuditOutcome) -> ExitCode {
    if outcome.is_clean() {
        return ExitCode::SUCCESS;
    }

    if !outcome.failed_checks().is_empty() {
        return ExitCode::FAILURE;
    }

    match outcome {
        AuditOutcome::NoDestinationsConfigured { .. } => {
            ExitCode::from(EXIT_NO_DESTINATIONS)
        },
        AuditOutcome::Published { report, .. } if !report.is_complete() => {
            ExitCode::FAILURE
        },
        _ => ExitCode::SUCCESS,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches    = cli::parse_args();
    let mut config = cli::client_config(&matches);
    let sdk_config = config.sdk_config().await;

    // The SDK may have found a region in a profile that we didn't see.
    if let Some(region) = sdk_config.region() {
        config.region = config.region.set_region(region.as_ref());
    }

    let auditor = Auditor::new(
        s3::Client::new(&sdk_config, config.region.clone()),
        sts::Client::new(&sdk_config),
        sns::Client::new(&sdk_config),
    );

    let outcome = match auditor.run(&config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Audit failed: {:#}", e);
            return Err(e);
        },
    };

    print_findings(&outcome);
    print_failed_checks(outcome.failed_checks());

    if let AuditOutcome::NoDestinationsConfigured { .. } = outcome {
        warn!("Unencrypted buckets found but no topics are configured, set --topic or S3ENC_TOPICS");
    }

    Ok(exit_code(&outcome))
}
