// Implements the S3 Client
#![forbid(unsafe_code)]
#![deny(missing_docs)]
use anyhow::{
    Context,
    Result,
};
use aws_sdk_s3::client::Client as S3Client;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::error::{
    ProvideErrorMetadata,
    SdkError,
};
use aws_sdk_s3::operation::get_bucket_encryption::GetBucketEncryptionOutput;
use aws_smithy_types_convert::date_time::DateTimeExt;
use aws_types::SdkConfig;
use crate::common::{
    Bucket,
    Buckets,
    Region,
};
use std::collections::HashMap;
use std::sync::{
    Mutex,
    PoisonError,
};
use tracing::debug;

/// Error code S3 returns from `GetBucketEncryption` when a bucket has no
/// server side encryption configuration.
pub const NOT_CONFIGURED_CODE: &str =
    "ServerSideEncryptionConfigurationNotFoundError";

/// Returns true if `code` is S3 telling us that no encryption configuration
/// exists. This is the only error that means "unencrypted".
pub fn is_not_configured(code: Option<&str>) -> bool {
    code == Some(NOT_CONFIGURED_CODE)
}

// GetBucketLocation returns nothing for us-east-1 and "EU" for some old
// eu-west-1 buckets.
fn location_to_region(location: Option<&str>) -> String {
    match location {
        None | Some("") => "us-east-1".into(),
        Some("EU")      => "eu-west-1".into(),
        Some(location)  => location.into(),
    }
}

/// The S3 `Client`.
pub struct Client {
    /// The AWS SDK `S3Client`.
    pub client: S3Client,

    /// `Region` that the client was created in.
    pub region: Region,

    /// Shared config used to create clients for buckets living in other
    /// regions.
    pub sdk_config: SdkConfig,

    // Clients for other regions, keyed by region name.
    regional: Mutex<HashMap<String, S3Client>>,
}

impl Client {
    /// Return a new S3 `Client` for the given shared config and `Region`.
    pub fn new(sdk_config: &SdkConfig, region: Region) -> Self {
        debug!("new: Creating S3Client in region '{}'", region.name());

        let client = S3Client::new(sdk_config);

        Self {
            client,
            region,
            sdk_config: sdk_config.clone(),
            regional:   Mutex::new(HashMap::new()),
        }
    }

    /// Returns every bucket owned by the account, in listing order.
    ///
    /// Buckets that somehow come back without a name are skipped.
    pub async fn list_buckets(&self) -> Result<Buckets> {
        let output = self.client.list_buckets()
            .send()
            .await
            .context("ListBuckets failed")?;

        debug!("list_buckets: API returned: {:#?}", output);

        let buckets = output.buckets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|bucket| {
                let name          = bucket.name?;
                let creation_date = bucket.creation_date
                    .and_then(|date| date.to_chrono_utc().ok());

                Some(Bucket {
                    name,
                    creation_date,
                })
            })
            .collect();

        Ok(buckets)
    }

    /// Returns the name of the region that `bucket` lives in.
    pub async fn get_bucket_location(&self, bucket: &str) -> Result<String> {
        debug!("get_bucket_location: Getting location for '{}'", bucket);

        let output = self.client.get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .with_context(|| format!("GetBucketLocation failed for '{}'", bucket))?;

        let location = output.location_constraint()
            .map(|constraint| constraint.as_str());

        let region = location_to_region(location);

        debug!("get_bucket_location: '{}' is in '{}'", bucket, region);

        Ok(region)
    }

    /// Returns the encryption configuration of `bucket`, or `None` if it
    /// doesn't have one.
    ///
    /// Only S3's "not found" error code maps to `None`. Access denied,
    /// missing buckets, throttling and transport errors are all returned as
    /// errors.
    pub async fn get_bucket_encryption(
        &self,
        bucket: &str,
    ) -> Result<Option<GetBucketEncryptionOutput>> {
        let client = self.client_for_bucket(bucket).await?;

        let result = client.get_bucket_encryption()
            .bucket(bucket)
            .send()
            .await;

        match result {
            Ok(output) => Ok(Some(output)),
            Err(err) => {
                let code = match &err {
                    SdkError::ServiceError(e) => e.err().code(),
                    _                         => None,
                };

                if is_not_configured(code) {
                    debug!("get_bucket_encryption: '{}' has no configuration", bucket);

                    return Ok(None);
                }

                Err(err).with_context(|| {
                    format!("GetBucketEncryption failed for '{}'", bucket)
                })
            },
        }
    }

    // S3 won't answer GetBucketEncryption for a bucket outside of the
    // client's region, so buckets elsewhere use a client for their region.
    async fn client_for_bucket(&self, bucket: &str) -> Result<S3Client> {
        let location = self.get_bucket_location(bucket).await?;

        if location == self.region.name() {
            return Ok(self.client.clone());
        }

        debug!("client_for_bucket: '{}' is in '{}'", bucket, location);

        Ok(self.regional_client(&location))
    }

    // One client per region, created on first use and shared by every bucket
    // in that region.
    fn regional_client(&self, region: &str) -> S3Client {
        let mut regional = self.regional
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        regional
            .entry(region.to_string())
            .or_insert_with(|| {
                debug!("regional_client: Creating S3Client in '{}'", region);

                let config = S3ConfigBuilder::from(&self.sdk_config)
                    .region(aws_sdk_s3::config::Region::new(region.to_string()))
                    .build();

                S3Client::from_conf(config)
            })
            .clone()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use aws_sdk_s3::config::Config as S3Config;
    use aws_sdk_s3::config::Credentials;
    use aws_smithy_client::erase::DynConnector;
    use aws_smithy_client::test_connection::TestConnection;
    use aws_smithy_http::body::SdkBody;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;

    /// What the mock connection should answer with.
    pub enum ResponseType<'a> {
        FromFile(&'a str),
        FromFileWithStatus(&'a str, u16),
    }

    // Create a mock S3 client in eu-west-1, replaying the given responses in
    // order. S3 tests in other modules import this too.
    pub fn mock_client(responses: Vec<ResponseType<'_>>) -> Client {
        let events = responses
            .iter()
            .map(|r| {
                let (file, status) = match r {
                    ResponseType::FromFile(file)                   => (file, 200),
                    ResponseType::FromFileWithStatus(file, status) => (file, *status),
                };

                let path = Path::new("test-data").join(file);
                let data = fs::read_to_string(path).unwrap();

                (
                    http::Request::builder()
                        .body(SdkBody::from("request body"))
                        .unwrap(),

                    http::Response::builder()
                        .status(status)
                        .body(SdkBody::from(data))
                        .unwrap(),
                )
            })
            .collect();

        let conn = TestConnection::new(events);
        let conn = DynConnector::new(conn);

        let creds = Credentials::from_keys(
            "ATESTCLIENT",
            "atestsecretkey",
            Some("atestsessiontoken".to_string()),
        );

        let conf = S3Config::builder()
            .credentials_provider(creds)
            .http_connector(conn)
            .region(aws_sdk_s3::config::Region::new("eu-west-1"))
            .build();

        Client {
            client:     S3Client::from_conf(conf),
            region:     Region::default().set_region("eu-west-1"),
            sdk_config: SdkConfig::builder().build(),
            regional:   Mutex::new(HashMap::new()),
        }
    }

    #[test]
    fn test_is_not_configured() {
        let tests = vec![
            (Some("ServerSideEncryptionConfigurationNotFoundError"), true),
            (Some("AccessDenied"),                                    false),
            (Some("NoSuchBucket"),                                    false),
            (Some("SlowDown"),                                        false),
            (Some(""),                                                false),
            (None,                                                    false),
        ];

        for test in tests {
            let code     = test.0;
            let expected = test.1;

            assert_eq!(is_not_configured(code), expected, "code: {:?}", code);
        }
    }

    #[test]
    fn test_location_to_region() {
        let tests = vec![
            (None,                 "us-east-1"),
            (Some(""),             "us-east-1"),
            (Some("EU"),           "eu-west-1"),
            (Some("eu-central-1"), "eu-central-1"),
        ];

        for test in tests {
            let location = test.0;
            let expected = test.1;

            assert_eq!(location_to_region(location), expected);
        }
    }

    #[tokio::test]
    async fn test_list_buckets() {
        let client = mock_client(vec![
            ResponseType::FromFile("s3-list-buckets.xml"),
        ]);

        let ret = client.list_buckets().await.unwrap();

        let names: Vec<&str> = ret.iter()
            .map(|b| b.name.as_str())
            .collect();

        // Listing order is kept, not sorted.
        let expected = vec![
            "another-bucket-name",
            "a-bucket-name",
        ];

        assert_eq!(names, expected);
        assert!(ret.iter().all(|b| b.creation_date.is_some()));
    }

    #[tokio::test]
    async fn test_list_buckets_empty() {
        let client = mock_client(vec![
            ResponseType::FromFile("s3-list-buckets-empty.xml"),
        ]);

        let ret = client.list_buckets().await.unwrap();

        assert!(ret.is_empty());
    }

    #[tokio::test]
    async fn test_list_buckets_access_denied() {
        let client = mock_client(vec![
            ResponseType::FromFileWithStatus("s3-error-access-denied.xml", 403),
        ]);

        let ret = client.list_buckets().await;

        assert!(ret.is_err());
    }

    #[tokio::test]
    async fn test_get_bucket_location() {
        let tests = vec![
            ("s3-get-bucket-location.xml",      "eu-west-1"),
            ("s3-get-bucket-location-eu.xml",   "eu-west-1"),
            ("s3-get-bucket-location-null.xml", "us-east-1"),
        ];

        for test in tests {
            let file     = test.0;
            let expected = test.1;

            let client = mock_client(vec![ResponseType::FromFile(file)]);

            let ret = client.get_bucket_location("test-bucket")
                .await
                .unwrap();

            assert_eq!(ret, expected);
        }
    }

    #[tokio::test]
    async fn test_get_bucket_encryption_configured() {
        let client = mock_client(vec![
            ResponseType::FromFile("s3-get-bucket-location.xml"),
            ResponseType::FromFile("s3-get-bucket-encryption.xml"),
        ]);

        let ret = client.get_bucket_encryption("test-bucket")
            .await
            .unwrap();

        assert!(ret.is_some());
    }

    #[tokio::test]
    async fn test_get_bucket_encryption_not_configured() {
        let client = mock_client(vec![
            ResponseType::FromFile("s3-get-bucket-location.xml"),
            ResponseType::FromFileWithStatus("s3-error-encryption-not-found.xml", 404),
        ]);

        let ret = client.get_bucket_encryption("test-bucket")
            .await
            .unwrap();

        assert!(ret.is_none());
    }

    #[tokio::test]
    async fn test_get_bucket_encryption_errors() {
        let tests = vec![
            ("s3-error-access-denied.xml",  403),
            ("s3-error-no-such-bucket.xml", 404),
        ];

        for test in tests {
            let file   = test.0;
            let status = test.1;

            let client = mock_client(vec![
                ResponseType::FromFile("s3-get-bucket-location.xml"),
                ResponseType::FromFileWithStatus(file, status),
            ]);

            let ret = client.get_bucket_encryption("test-bucket").await;

            assert!(ret.is_err(), "{} should be an error", file);
        }
    }

    #[test]
    fn test_regional_client_reused() {
        let client = mock_client(vec![]);

        let regions = vec![
            "eu-central-1",
            "eu-central-1",
            "us-east-1",
            "eu-central-1",
        ];

        for region in regions {
            client.regional_client(region);
        }

        let mut cached: Vec<String> = client.regional
            .lock()
            .unwrap()
            .keys()
            .cloned()
            .collect();

        cached.sort();

        assert_eq!(cached, vec!["eu-central-1", "us-east-1"]);
    }
}
