//! Media Store
//!
//! Owns the uploads directory tree and is the only code that touches
//! uploaded binary files. Stored references are public relative paths
//! ("/uploads/<dir>/<file>"), never absolute filesystem paths.
//!
//! Deletion is best-effort: a failure is logged and never fails the
//! owning request.

use std::path::PathBuf;

use tokio::fs;
use uuid::Uuid;

use crate::db::models::MediaKind;
use crate::utils::AppError;

/// Public URL prefix the uploads tree is served under
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Upload field type, keyed to its storage subdirectory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Generic media attachment (image or video)
    Media,
    /// Primary product image
    Image,
    Pdf,
    Video,
}

impl UploadKind {
    fn subdir(&self) -> &'static str {
        match self {
            UploadKind::Media => "media",
            UploadKind::Image => "images",
            UploadKind::Pdf => "pdfs",
            UploadKind::Video => "videos",
        }
    }
}

#[derive(Clone, Debug)]
pub struct MediaStore {
    /// Filesystem root of the uploads tree
    uploads_dir: PathBuf,
}

impl MediaStore {
    pub fn new(uploads_dir: PathBuf) -> Self {
        Self { uploads_dir }
    }

    pub fn uploads_dir(&self) -> &PathBuf {
        &self.uploads_dir
    }

    /// Ensure the per-kind subdirectories exist
    pub fn ensure_layout(&self) -> std::io::Result<()> {
        for kind in [
            UploadKind::Media,
            UploadKind::Image,
            UploadKind::Pdf,
            UploadKind::Video,
        ] {
            std::fs::create_dir_all(self.uploads_dir.join(kind.subdir()))?;
        }
        Ok(())
    }

    /// Persist an uploaded file, returning its public relative path
    pub async fn save(
        &self,
        kind: UploadKind,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        let filename = format!("{}-{}", Uuid::new_v4(), sanitize_filename(original_name));
        let path = self.uploads_dir.join(kind.subdir()).join(&filename);

        fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::internal(format!("Failed to save upload {}: {}", filename, e)))?;

        Ok(format!("{}/{}/{}", PUBLIC_PREFIX, kind.subdir(), filename))
    }

    /// Best-effort deletion of a stored file by its public relative path
    ///
    /// Non-fatal by contract: outcomes are logged, never propagated.
    pub async fn delete(&self, public_path: &str) {
        let Some(relative) = public_path.strip_prefix(&format!("{}/", PUBLIC_PREFIX)) else {
            tracing::warn!(path = %public_path, "Refusing to delete file outside uploads tree");
            return;
        };
        // Reject traversal out of the uploads tree
        if relative.split('/').any(|seg| seg == "..") {
            tracing::warn!(path = %public_path, "Refusing to delete file outside uploads tree");
            return;
        }

        let path = self.uploads_dir.join(relative);
        match fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %public_path, "Deleted media file"),
            Err(e) => tracing::warn!(path = %public_path, error = %e, "Failed to delete media file"),
        }
    }

    /// Classify an upload as image or video
    ///
    /// Prefers the multipart content type; falls back to guessing from the
    /// filename extension. Anything not recognizably an image is a video,
    /// matching the wire contract's two-value enumeration.
    pub fn classify(content_type: Option<&str>, filename: &str) -> MediaKind {
        if let Some(ct) = content_type {
            if ct.starts_with("image") {
                return MediaKind::Image;
            }
            if ct.starts_with("video") {
                return MediaKind::Video;
            }
        }
        let guessed = mime_guess::from_path(filename).first_or_octet_stream();
        if guessed.type_() == mime_guess::mime::IMAGE {
            MediaKind::Image
        } else {
            MediaKind::Video
        }
    }
}

/// Keep filenames shell- and URL-friendly
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefers_content_type() {
        assert_eq!(MediaStore::classify(Some("image/png"), "x.mp4"), MediaKind::Image);
        assert_eq!(MediaStore::classify(Some("video/mp4"), "x.png"), MediaKind::Video);
        assert_eq!(MediaStore::classify(None, "clip.png"), MediaKind::Image);
        assert_eq!(MediaStore::classify(None, "clip.mov"), MediaKind::Video);
    }

    #[test]
    fn sanitize_strips_awkward_characters() {
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my-photo--1-.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "..-..-etc-passwd");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[tokio::test]
    async fn save_and_delete_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MediaStore::new(tmp.path().to_path_buf());
        store.ensure_layout().unwrap();

        let src = store
            .save(UploadKind::Media, "photo.jpg", b"bytes")
            .await
            .unwrap();
        assert!(src.starts_with("/uploads/media/"));
        let on_disk = tmp.path().join(src.trim_start_matches("/uploads/"));
        assert!(on_disk.exists());

        store.delete(&src).await;
        assert!(!on_disk.exists());

        // deleting again is non-fatal
        store.delete(&src).await;
        // refusing paths outside the tree is non-fatal too
        store.delete("/etc/passwd").await;
    }
}
