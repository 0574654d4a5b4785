use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

pub mod presign_upload;

pub const MAX_FILE_NAME_LEN: usize = 100;

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));
static CONTENT_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9.+-]*/[a-z0-9][a-z0-9.+-]*$").expect("valid content type regex"));

/// Keeps `[A-Za-z0-9._-]`, collapses everything else into `-`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned = UNSAFE_CHARS.replace_all(base.trim(), "-");
    let cleaned = cleaned.trim_matches(|c| c == '-' || c == '.');
    let truncated: String = cleaned.chars().take(MAX_FILE_NAME_LEN).collect();
    if truncated.is_empty() {
        "file".to_string()
    } else {
        truncated
    }
}

pub fn is_valid_content_type(value: &str) -> bool {
    CONTENT_TYPE.is_match(&value.trim().to_ascii_lowercase())
}

/// `{prefix}/{owner}/{millis}-{nonce}-{name}`; the nonce keeps two calls in the
/// same millisecond apart.
pub fn object_key(prefix: &str, owner: Uuid, file_name: &str, now: DateTime<Utc>) -> String {
    let nonce = Uuid::new_v4().simple().to_string();
    format!(
        "{}/{}/{}-{}-{}",
        prefix,
        owner,
        now.timestamp_millis(),
        &nonce[..8],
        sanitize_file_name(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_file_name("my photo (1).PNG"), "my-photo-1-.PNG");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\cv.pdf"), "cv.pdf");
        assert_eq!(sanitize_file_name("   "), "file");
        assert_eq!(sanitize_file_name("ሰላም.txt"), "txt");
        assert_eq!(sanitize_file_name(&"a".repeat(300)).len(), MAX_FILE_NAME_LEN);
    }

    #[test]
    fn content_types() {
        assert!(is_valid_content_type("image/png"));
        assert!(is_valid_content_type("application/vnd.openxmlformats-officedocument.wordprocessingml.document"));
        assert!(!is_valid_content_type("image"));
        assert!(!is_valid_content_type("image/png; charset=x"));
    }

    #[test]
    fn keys_embed_timestamp_and_name_and_differ() {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let a = object_key("uploads", owner, "cv.pdf", now);
        let b = object_key("uploads", owner, "cv.pdf", now);
        assert_ne!(a, b);
        assert!(a.starts_with(&format!("uploads/{owner}/{}-", now.timestamp_millis())));
        assert!(a.ends_with("-cv.pdf"));
    }
}
