//! 🪣🚀🌐 S3 backend -- the ground-to-cloud data paratrooper.
//!
//! INT. AWS CONSOLE -- NIGHT. An empty bucket sits in us-east-1, waiting.
//! Somewhere, a laptop holds a folder of PDFs and a deadline. This module is
//! the one `PutObject` call between them, repeated once per file, with
//! feeling.
//!
//! 🧠 Knowledge graph:
//! - `S3StoreConfig`: optional region override, nothing else. Credentials,
//!   endpoint and default region are whatever the ambient AWS environment says.
//! - `S3Store`: wraps one `aws_sdk_s3::Client`, built once per run.
//! - Transport: `ByteStream::from_path` → `PutObject`.

use std::error::Error as StdError;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::backends::ObjectStore;
use crate::common::ObjectKey;

/// 🔧 S3 knobs. There is exactly one.
///
/// Leave `region` unset and aws-config goes looking in `AWS_REGION`,
/// `~/.aws/config`, and instance metadata, in that order, like a dog that lost
/// its ball.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct S3StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// 🪣 The production [`ObjectStore`]. One client, shared read-only for the whole run.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
}

impl S3Store {
    /// 🚀 Build the client from the ambient AWS environment.
    ///
    /// This never talks to S3; a wrong region or a missing credential shows up
    /// later, as a per-file failure on the first upload.
    pub async fn new(store_config: &S3StoreConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &store_config.region {
            debug!("🌎 region pinned by config: {region}");
            loader = loader.region(aws_sdk_s3::config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;
        Self::from_client(aws_sdk_s3::Client::new(&sdk_config))
    }

    /// 🔌 Wrap a client someone else already built. Handy for custom endpoints.
    pub fn from_client(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_file(&self, local_path: &Path, bucket: &str, key: &ObjectKey) -> Result<()> {
        let body = ByteStream::from_path(local_path).await.with_context(|| {
            format!(
                "💀 could not open '{}' for streaming. It was there during the walk. \
                 It is not here now. Files are like that sometimes.",
                local_path.display()
            )
        })?;

        trace!("📡 PutObject s3://{bucket}/{key}");
        self.client
            .put_object()
            .bucket(bucket)
            .key(key.as_str())
            .body(body)
            .send()
            .await
            .map_err(|err| anyhow!("{}", describe_sdk_failure(&err)))?;
        Ok(())
    }
}

/// 🩺 One readable line out of an `SdkError`.
///
/// Service errors get their S3 code and message (`NoSuchBucket: The specified
/// bucket does not exist`). Everything else gets its `source()` chain joined
/// with `: `, which is where "connection refused" and friends hide. No `Debug`
/// dumps: this ends up in a per-file log line.
fn describe_sdk_failure<E, R>(err: &SdkError<E, R>) -> String
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: std::fmt::Debug,
{
    if let Some(service_err) = err.as_service_error() {
        return format!(
            "service error: {}: {}",
            service_err.code().unwrap_or("Unknown"),
            service_err.message().unwrap_or("no message from S3")
        );
    }

    let mut rendered = err.to_string();
    let mut cause = err.source();
    while let Some(next) = cause {
        rendered.push_str(": ");
        rendered.push_str(&next.to_string());
        cause = next.source();
    }
    rendered
}
