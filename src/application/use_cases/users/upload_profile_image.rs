use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

use crate::application::ports::object_storage_port::ObjectStoragePort;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::uploads::object_key;
use crate::domain::errors::DomainError;

pub const PROFILE_IMAGE_PREFIX: &str = "profile-images";

/// Raster formats accepted for avatars. SVG and other markup types are refused.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/webp"];

pub struct UploadProfileImage<'a, U, S>
where
    U: UserRepository + ?Sized,
    S: ObjectStoragePort + ?Sized,
{
    pub users: &'a U,
    pub storage: &'a S,
    pub max_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Accepts `data:image/<kind>;base64,<payload>` or bare base64. The decoded bytes
/// must be PNG, JPEG, GIF or WebP, and a declared type must agree with them.
pub fn decode_image_data(image_data: &str, max_bytes: usize) -> Result<DecodedImage, DomainError> {
    let raw = image_data.trim();
    let (declared, payload) = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (meta, payload) = rest
                .split_once(',')
                .ok_or_else(|| DomainError::validation("malformed data URL"))?;
            let ct = meta
                .strip_suffix(";base64")
                .ok_or_else(|| DomainError::validation("data URL must be base64 encoded"))?;
            (Some(ct.trim().to_ascii_lowercase()), payload)
        }
        None => (None, raw),
    };
    // Reject obviously oversized payloads before decoding.
    if payload.len() / 4 * 3 > max_bytes + 3 {
        return Err(DomainError::validation("image is too large"));
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| DomainError::validation("image data is not valid base64"))?;
    if bytes.is_empty() {
        return Err(DomainError::validation("image is empty"));
    }
    if bytes.len() > max_bytes {
        return Err(DomainError::validation("image is too large"));
    }
    if let Some(ct) = declared.as_deref() {
        if !ALLOWED_IMAGE_TYPES.contains(&ct) {
            return Err(DomainError::validation(
                "profile pictures must be PNG, JPEG, GIF or WebP",
            ));
        }
    }
    let sniffed = sniff_image_type(&bytes)
        .ok_or_else(|| DomainError::validation("unrecognized image format"))?;
    if declared.as_deref().is_some_and(|ct| ct != sniffed) {
        return Err(DomainError::validation(
            "image content does not match its declared type",
        ));
    }
    let content_type = sniffed.to_string();
    Ok(DecodedImage {
        content_type,
        bytes,
    })
}

fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF8") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

impl<'a, U, S> UploadProfileImage<'a, U, S>
where
    U: UserRepository + ?Sized,
    S: ObjectStoragePort + ?Sized,
{
    /// Stores the image and points the user's avatar at it. Returns the public URL.
    pub async fn execute(&self, user_id: Uuid, image_data: &str) -> anyhow::Result<String> {
        let image = decode_image_data(image_data, self.max_bytes)?;
        let ext = mime_guess::get_mime_extensions_str(&image.content_type)
            .and_then(|exts| exts.first().copied())
            .unwrap_or("img");
        let key = object_key(
            PROFILE_IMAGE_PREFIX,
            user_id,
            &format!("avatar.{ext}"),
            chrono::Utc::now(),
        );
        self.storage
            .put_object(&key, image.bytes, &image.content_type)
            .await?;
        let url = self.storage.public_url(&key);
        if !self.users.set_image(user_id, &url).await? {
            return Err(DomainError::NotFound("user").into());
        }
        tracing::info!(user_id = %user_id, key = %key, "profile_image_updated");
        Ok(url)
    }
}
