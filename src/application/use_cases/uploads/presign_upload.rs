use std::time::Duration;

use uuid::Uuid;

use crate::application::ports::object_storage_port::ObjectStoragePort;
use crate::application::use_cases::uploads::{is_valid_content_type, object_key};
use crate::domain::errors::DomainError;

pub const UPLOAD_PREFIX: &str = "uploads";

#[derive(Debug, Clone)]
pub struct PresignedUpload {
    pub url: String,
    pub key: String,
    pub public_url: String,
    pub expires_in: u64,
}

pub struct PresignUpload<'a, S: ObjectStoragePort + ?Sized> {
    pub storage: &'a S,
    pub expires_in: Duration,
}

impl<'a, S: ObjectStoragePort + ?Sized> PresignUpload<'a, S> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        file_name: &str,
        file_type: &str,
    ) -> anyhow::Result<PresignedUpload> {
        if !is_valid_content_type(file_type) {
            return Err(DomainError::validation("fileType must look like type/subtype").into());
        }
        let content_type = file_type.trim().to_ascii_lowercase();
        let key = object_key(UPLOAD_PREFIX, user_id, file_name, chrono::Utc::now());
        let url = self
            .storage
            .presign_put(&key, &content_type, self.expires_in)
            .await?;
        Ok(PresignedUpload {
            url,
            public_url: self.storage.public_url(&key),
            key,
            expires_in: self.expires_in.as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::FakeObjectStorage;

    #[tokio::test]
    async fn presigns_with_configured_expiry_and_unique_keys() {
        let storage = FakeObjectStorage::default();
        let uc = PresignUpload {
            storage: &storage,
            expires_in: Duration::from_secs(3600),
        };
        let user = Uuid::new_v4();
        let a = uc.execute(user, "brief.pdf", "application/pdf").await.unwrap();
        let b = uc.execute(user, "brief.pdf", "application/pdf").await.unwrap();
        assert_ne!(a.url, b.url);
        assert_ne!(a.key, b.key);
        assert_eq!(a.expires_in, 3600);
        assert!(a.key.ends_with("-brief.pdf"));
        assert!(a.public_url.ends_with(&a.key));

        let calls = storage.presigned.lock().await;
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(_, ct, exp)| ct == "application/pdf"
            && *exp == Duration::from_secs(3600)));
    }

    #[tokio::test]
    async fn bad_file_type_rejected() {
        let storage = FakeObjectStorage::default();
        let uc = PresignUpload {
            storage: &storage,
            expires_in: Duration::from_secs(3600),
        };
        assert!(uc.execute(Uuid::new_v4(), "x.bin", "binary").await.is_err());
        assert!(storage.presigned.lock().await.is_empty());
    }
}
