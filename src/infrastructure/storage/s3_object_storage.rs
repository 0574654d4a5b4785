use std::time::Duration;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, error::SdkError};

use crate::application::ports::object_storage_port::ObjectStoragePort;
use crate::bootstrap::config::Config;

pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
    public_base: String,
}

impl S3ObjectStorage {
    pub async fn new(cfg: &Config) -> anyhow::Result<Self> {
        let bucket = cfg
            .s3_bucket
            .clone()
            .context("S3_BUCKET must be set to enable uploads")?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &cfg.s3_region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared_config = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);

        if let (Some(access), Some(secret)) = (&cfg.s3_access_key, &cfg.s3_secret_key) {
            let creds = Credentials::new(
                access.clone(),
                secret.clone(),
                None,
                None,
                "marketplace-s3-static",
            );
            builder = builder.credentials_provider(creds);
        }
        if let Some(endpoint) = &cfg.s3_endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }
        if cfg.s3_use_path_style {
            builder = builder.force_path_style(true);
        }
        let client = Client::from_conf(builder.build());

        if let Err(e) = ensure_bucket(&client, &bucket).await {
            // Presigning works without bucket access; uploads will surface the real error.
            tracing::warn!(bucket = %bucket, error = ?e, "s3_bucket_check_failed");
        }

        let public_base = cfg.s3_public_base_url.clone().unwrap_or_else(|| {
            default_public_base(
                &bucket,
                cfg.s3_region.as_deref(),
                cfg.s3_endpoint.as_deref(),
                cfg.s3_use_path_style,
            )
        });

        Ok(Self {
            client,
            bucket,
            public_base,
        })
    }
}

/// Where objects are readable from when no explicit base URL is configured.
pub fn default_public_base(
    bucket: &str,
    region: Option<&str>,
    endpoint: Option<&str>,
    path_style: bool,
) -> String {
    match endpoint {
        Some(ep) => {
            let ep = ep.trim_end_matches('/');
            if path_style {
                format!("{ep}/{bucket}")
            } else if let Some((scheme, host)) = ep.split_once("://") {
                format!("{scheme}://{bucket}.{host}")
            } else {
                format!("{ep}/{bucket}")
            }
        }
        None => {
            let region = region.unwrap_or("us-east-1");
            format!("https://{bucket}.s3.{region}.amazonaws.com")
        }
    }
}

/// Joins `base` and `key`, percent-encoding each key segment.
pub fn object_url(base: &str, key: &str) -> String {
    let encoded: Vec<String> = key
        .split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect();
    format!("{}/{}", base.trim_end_matches('/'), encoded.join("/"))
}

#[async_trait]
impl ObjectStoragePort for S3ObjectStorage {
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> anyhow::Result<String> {
        let presign = PresigningConfig::expires_in(expires_in)
            .map_err(|e| anyhow!("invalid presign expiry: {e}"))?;
        let req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presign)
            .await
            .with_context(|| format!("failed to presign upload for {key}"))?;
        Ok(req.uri().to_string())
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> anyhow::Result<()> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .with_context(|| format!("failed to upload {key}"))?;
        tracing::debug!(key = %key, size, "s3_object_stored");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        object_url(&self.public_base, key)
    }
}

/// Stand-in used when no bucket is configured. Every upload fails with a clear error.
pub struct DisabledObjectStorage;

#[async_trait]
impl ObjectStoragePort for DisabledObjectStorage {
    async fn presign_put(
        &self,
        _key: &str,
        _content_type: &str,
        _expires_in: Duration,
    ) -> anyhow::Result<String> {
        Err(anyhow!("object storage is not configured (set S3_BUCKET)"))
    }

    async fn put_object(
        &self,
        _key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> anyhow::Result<()> {
        Err(anyhow!("object storage is not configured (set S3_BUCKET)"))
    }

    fn public_url(&self, key: &str) -> String {
        format!("/{key}")
    }
}

async fn ensure_bucket(client: &Client, bucket: &str) -> anyhow::Result<()> {
    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => return Ok(()),
        Err(SdkError::ServiceError(service_err)) => {
            if !matches!(service_err.err(), HeadBucketError::NotFound(_)) {
                return Err(anyhow!(service_err.err().to_string()));
            }
        }
        Err(err) => return Err(anyhow!(err.to_string())),
    }

    match client.create_bucket().bucket(bucket).send().await {
        Ok(_) => Ok(()),
        Err(SdkError::ServiceError(service_err)) => match service_err.err() {
            CreateBucketError::BucketAlreadyOwnedByYou(_) => Ok(()),
            CreateBucketError::BucketAlreadyExists(_) => Ok(()),
            other => Err(anyhow!(other.to_string())),
        },
        Err(err) => Err(anyhow!(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_base_follows_addressing_style() {
        assert_eq!(
            default_public_base("media", Some("eu-west-1"), None, false),
            "https://media.s3.eu-west-1.amazonaws.com"
        );
        assert_eq!(
            default_public_base("media", None, Some("http://localhost:9000/"), true),
            "http://localhost:9000/media"
        );
        assert_eq!(
            default_public_base("media", None, Some("https://r2.example.com"), false),
            "https://media.r2.example.com"
        );
    }

    #[test]
    fn object_url_encodes_segments_but_keeps_slashes() {
        assert_eq!(
            object_url("https://cdn.example.com/", "uploads/u1/a b.png"),
            "https://cdn.example.com/uploads/u1/a%20b.png"
        );
    }

    #[tokio::test]
    async fn disabled_storage_refuses_uploads() {
        let s = DisabledObjectStorage;
        assert!(
            s.presign_put("k", "image/png", Duration::from_secs(60))
                .await
                .is_err()
        );
        assert!(s.put_object("k", vec![1], "image/png").await.is_err());
    }
}
