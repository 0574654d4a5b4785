use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait ObjectStoragePort: Send + Sync {
    /// URL the browser can `PUT` the object to directly.
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> anyhow::Result<String>;
    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str)
    -> anyhow::Result<()>;
    fn public_url(&self, key: &str) -> String;
}
