// Command line interface parsing
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use clap::{
    crate_description,
    crate_name,
    crate_version,
    value_parser,
    Arg,
    ArgAction,
    ArgMatches,
    Command,
};
use crate::common::{
    is_valid_subject,
    AlertOptions,
    ClientConfig,
    Region,
    DEFAULT_CONCURRENCY,
};
use tracing::debug;

// Ensures that the region we're given at least looks like a region. The SDK
// will tell us if it doesn't exist.
fn is_valid_aws_region(s: &str) -> Result<String, String> {
    if s.is_empty() || s.contains(char::is_whitespace) {
        return Err(format!("'{}' is not a valid AWS region", s));
    }

    Ok(s.to_string())
}

// Prefixes are free text, but an empty one makes for a confusing alert.
fn is_valid_message_prefix(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("message prefix must not be empty".into());
    }

    Ok(s.to_string())
}

// Create the clap Command
fn create_app() -> Command {
    debug!("Creating CLI app");

    Command::new(crate_name!())
        .version(crate_version!())
        .about(crate_description!())
        .arg(
            Arg::new("CONCURRENCY")
                .env("S3ENC_CONCURRENCY")
                .long("concurrency")
                .short('c')
                .value_name("COUNT")
                .help("Number of bucket encryption checks to run at once [default: 8]")
                .action(ArgAction::Set)
                .value_parser(value_parser!(u16).range(1..))
        )
        .arg(
            Arg::new("DRY_RUN")
                .long("dry-run")
                .short('n')
                .help("Print the alert instead of publishing it")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("MESSAGE_PREFIX")
                .env("S3ENC_MESSAGE_PREFIX")
                .hide_env_values(true)
                .long("message-prefix")
                .short('m')
                .value_name("TEXT")
                .help("Replace the explanatory text at the start of the alert")
                .action(ArgAction::Set)
                .value_parser(is_valid_message_prefix)
        )
        .arg(
            Arg::new("REGION")
                .env("AWS_REGION")
                .hide_env_values(true)
                .long("region")
                .short('r')
                .value_name("REGION")
                .help("Set the AWS region to create the clients in.")
                .action(ArgAction::Set)
                .value_parser(is_valid_aws_region)
        )
        .arg(
            Arg::new("SUBJECT")
                .env("S3ENC_SUBJECT")
                .hide_env_values(true)
                .long("subject")
                .short('s')
                .value_name("SUBJECT")
                .help("Replace the default alert subject")
                .action(ArgAction::Set)
                .value_parser(is_valid_subject)
        )
        .arg(
            Arg::new("TOPIC")
                .env("S3ENC_TOPICS")
                .hide_env_values(true)
                .long("topic")
                .short('t')
                .value_name("TOPIC_ARN")
                .help("SNS topic ARN to publish the alert to, may be repeated")
                .action(ArgAction::Append)
                .value_delimiter(',')
        )
}

/// Parse the command line arguments.
pub fn parse_args() -> ArgMatches {
    debug!("Parsing command line arguments");

    create_app().get_matches()
}

/// Build the `ClientConfig` from parsed arguments.
pub fn client_config(matches: &ArgMatches) -> ClientConfig {
    let mut region = Region::new();

    if let Some(name) = matches.get_one::<String>("REGION") {
        region = region.set_region(name);
    }

    // A trailing comma in S3ENC_TOPICS shouldn't give us an empty topic.
    let topics = matches.get_many::<String>("TOPIC")
        .map(|topics| {
            topics
                .map(|topic| topic.trim())
                .filter(|topic| !topic.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let alert = AlertOptions {
        subject:        matches.get_one::<String>("SUBJECT").cloned(),
        message_prefix: matches.get_one::<String>("MESSAGE_PREFIX").cloned(),
    };

    let concurrency = matches.get_one::<u16>("CONCURRENCY")
        .map(|c| usize::from(*c))
        .unwrap_or(DEFAULT_CONCURRENCY);

    let config = ClientConfig {
        region,
        topics,
        alert,
        concurrency,
        dry_run: matches.get_flag("DRY_RUN"),
    };

    debug!("client_config: {:?}", config);

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_client_config_topics() {
        let args = vec![
            "s3enc",
            "--topic", "arn:aws:sns:eu-west-1:123456789012:a",
            "--topic", "arn:aws:sns:eu-west-1:123456789012:b,",
        ];

        let matches = create_app().try_get_matches_from(args).unwrap();
        let config  = client_config(&matches);

        let expected = vec![
            "arn:aws:sns:eu-west-1:123456789012:a",
            "arn:aws:sns:eu-west-1:123456789012:b",
        ];

        assert_eq!(config.topics, expected);
    }

    #[test]
    fn test_client_config_options() {
        let args = vec![
            "s3enc",
            "--subject", "Custom subject",
            "--message-prefix", "Please fix.",
            "--concurrency", "2",
            "--region", "eu-central-1",
            "--dry-run",
        ];

        let matches = create_app().try_get_matches_from(args).unwrap();
        let config  = client_config(&matches);

        let expected = AlertOptions {
            subject:        Some("Custom subject".into()),
            message_prefix: Some("Please fix.".into()),
        };

        assert_eq!(config.alert, expected);
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.region.name(), "eu-central-1");
        assert!(config.dry_run);
    }

    #[test]
    fn test_invalid_args() {
        let long_subject = "x".repeat(101);

        let tests = vec![
            vec!["s3enc", "--concurrency", "0"],
            vec!["s3enc", "--concurrency", "many"],
            vec!["s3enc", "--subject", long_subject.as_str()],
            vec!["s3enc", "--subject", ""],
            vec!["s3enc", "--message-prefix", " "],
            vec!["s3enc", "--region", ""],
        ];

        for args in tests {
            let ret = create_app().try_get_matches_from(args.clone());

            assert!(ret.is_err(), "{:?} should be rejected", args);
        }
    }

    #[test]
    fn test_is_valid_aws_region() {
        let tests = vec![
            ("eu-west-1",  true),
            ("us-east-1",  true),
            ("",           false),
            ("eu west 1",  false),
        ];

        for test in tests {
            let region   = test.0;
            let expected = test.1;

            assert_eq!(is_valid_aws_region(region).is_ok(), expected);
        }
    }
}
