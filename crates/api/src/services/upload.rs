//! Product image uploads.
//!
//! Images arrive as the `image` field of a multipart form and land in
//! `<media_dir>/img/`. File names are the upload timestamp in milliseconds
//! plus a short random suffix plus the sanitized original name, so two
//! uploads in the same millisecond cannot collide. The stored path is
//! relative (`media/img/...`) and resolves under the `/media` static mount.

use std::path::PathBuf;

use axum::extract::Multipart;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

/// Maximum accepted image size.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Multipart field name carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Errors that can occur while storing an uploaded image.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No `image` field in the multipart body.
    #[error("missing '{IMAGE_FIELD}' field")]
    MissingImageField,

    /// The file exceeds [`MAX_IMAGE_BYTES`].
    #[error("image exceeds {MAX_IMAGE_BYTES} bytes")]
    TooLarge,

    /// The multipart stream could not be read (includes bodies rejected by
    /// the request size limit).
    #[error("unreadable upload: {0}")]
    Unreadable(String),

    /// Filesystem write failed.
    #[error("failed to store image: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes uploaded images beneath a media root directory.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Create a store rooted at the configured media directory.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Consume a multipart body, store its `image` field and return the
    /// relative path to persist (e.g. `media/img/1712-ab12cd34-shoe.jpg`).
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::MissingImageField`] when no `image` field is
    /// present, [`UploadError::TooLarge`] past the size ceiling, and
    /// [`UploadError::Unreadable`]/[`UploadError::Io`] on stream or
    /// filesystem failures.
    pub async fn save_image(&self, mut multipart: Multipart) -> Result<String, UploadError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| UploadError::Unreadable(e.to_string()))?
        {
            if field.name() != Some(IMAGE_FIELD) {
                continue;
            }

            let original = sanitize_filename(field.file_name().unwrap_or("upload"));
            let data = field
                .bytes()
                .await
                .map_err(|e| UploadError::Unreadable(e.to_string()))?;

            if data.len() > MAX_IMAGE_BYTES {
                return Err(UploadError::TooLarge);
            }

            let filename = unique_filename(&original);

            let dir = self.root.join("img");
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(dir.join(&filename), &data).await?;

            return Ok(format!("media/img/{filename}"));
        }

        Err(UploadError::MissingImageField)
    }
}

/// Timestamped unique name for a stored upload.
fn unique_filename(original: &str) -> String {
    let stamp = Utc::now().timestamp_millis();
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(8);
    format!("{stamp}-{suffix}-{original}")
}

/// Strip spaces and anything that could escape the media directory from a
/// client-supplied file name.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_spaces_and_separators() {
        assert_eq!(sanitize_filename("summer shoe.jpg"), "summershoe.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename("white tee (2).png"), "whitetee2.png");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_filename("///"), "upload");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn test_unique_filename_varies() {
        let a = unique_filename("shoe.jpg");
        let b = unique_filename("shoe.jpg");
        assert_ne!(a, b);
        assert!(a.ends_with("-shoe.jpg"));
    }
}
