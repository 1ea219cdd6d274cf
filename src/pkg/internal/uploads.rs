use std::{
    fmt,
    path::{Path, PathBuf},
};

use axum::http::StatusCode;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use chrono::Utc;
use rand::Rng;
use standard_error::{StandardError, Status};

use crate::{pkg::internal::adaptors::applications::spec::StoredDocument, prelude::Result};

/// Public URL prefix the upload directory is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Longest stored display name; keeps generated paths inside `VARCHAR(255)`.
const MAX_NAME_LEN: usize = 100;
const MAX_EXT_LEN: usize = 16;

// browsers and older clients disagree on padding
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentRole {
    Resume,
    Other,
}

impl fmt::Display for AttachmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentRole::Resume => f.write_str("resume"),
            AttachmentRole::Other => f.write_str("other"),
        }
    }
}

/// A decoded attachment that has not been written yet.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub role: AttachmentRole,
    pub safe_name: String,
    pub bytes: Vec<u8>,
}

fn truncate_name(safe: String) -> String {
    if safe.len() <= MAX_NAME_LEN {
        return safe;
    }
    match safe.rfind('.') {
        Some(dot) if dot > 0 && safe.len() - dot <= MAX_EXT_LEN => {
            let ext = &safe[dot..];
            format!("{}{}", &safe[..MAX_NAME_LEN - ext.len()], ext)
        }
        _ => safe[..MAX_NAME_LEN].to_string(),
    }
}

/// Keeps only the final path component, maps everything outside
/// `[A-Za-z0-9._-]` to `_` and caps the length, preserving the extension.
pub fn sanitize_filename(raw: &str) -> String {
    let trimmed = raw.trim_end_matches(['/', '\\']);
    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or_default();
    let safe: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if safe.is_empty() {
        "file".into()
    } else {
        truncate_name(safe)
    }
}

/// Decodes a base64 payload, tolerating a `data:<mime>;base64,` style prefix.
pub fn decode_payload(raw: &str) -> Result<Vec<u8>> {
    let payload = match raw.split_once(',') {
        Some((_, rest)) => rest,
        None => raw,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    LENIENT
        .decode(compact.as_bytes())
        .map_err(|e| {
            tracing::debug!("rejected attachment payload: {}", e);
            StandardError::new("ERR-APP-004").code(StatusCode::BAD_REQUEST)
        })
}

/// Returns `Ok(None)` when either half of the attachment is missing.
pub fn prepare(
    role: AttachmentRole,
    name: Option<&str>,
    data: Option<&str>,
) -> Result<Option<PendingUpload>> {
    let (Some(name), Some(data)) = (
        name.filter(|n| !n.trim().is_empty()),
        data.filter(|d| !d.trim().is_empty()),
    ) else {
        return Ok(None);
    };
    Ok(Some(PendingUpload {
        role,
        safe_name: sanitize_filename(name),
        bytes: decode_payload(data)?,
    }))
}

/// Directory that attachment bytes are written into.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        UploadDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    fn file_name(user_id: i32, job_id: i32, upload: &PendingUpload) -> String {
        let suffix: u32 = rand::rng().random();
        format!(
            "{}_{}_{}_{}_{:08x}_{}",
            Utc::now().timestamp_millis(),
            user_id,
            job_id,
            upload.role,
            suffix,
            upload.safe_name
        )
    }

    pub async fn persist(
        &self,
        user_id: i32,
        job_id: i32,
        upload: &PendingUpload,
    ) -> Result<StoredDocument> {
        let file_name = Self::file_name(user_id, job_id, upload);
        let out = self.root.join(&file_name);
        if let Err(e) = tokio::fs::write(&out, &upload.bytes).await {
            tracing::error!("failed to write {}: {}", out.display(), e);
            return Err(StandardError::new("ERR-UPLOAD-001").code(StatusCode::INTERNAL_SERVER_ERROR));
        }
        tracing::debug!("stored {} bytes at {}", upload.bytes.len(), out.display());
        Ok(StoredDocument {
            name: upload.safe_name.clone(),
            path: format!("{}/{}", PUBLIC_PREFIX, file_name),
        })
    }

    /// Best-effort removal of a file written earlier in a failed request.
    pub async fn discard(&self, doc: &StoredDocument) {
        let Some(file_name) = doc.path.strip_prefix(&format!("{}/", PUBLIC_PREFIX)) else {
            return;
        };
        if let Err(e) = tokio::fs::remove_file(self.root.join(file_name)).await {
            tracing::warn!("could not remove orphaned upload {}: {}", doc.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(sanitize_filename("my resume (final).pdf"), "my_resume__final_.pdf");
        assert_eq!(sanitize_filename("docs/"), "docs");
        assert_eq!(sanitize_filename("/"), "file");
        assert_eq!(sanitize_filename("résumé.pdf"), "r_sum_.pdf");
    }

    #[test]
    fn test_sanitized_names_use_safe_charset_only() {
        for raw in ["../../etc/passwd", "a b;c|d$e.txt", "\0nul", "x/../../y z"] {
            let safe = sanitize_filename(raw);
            assert!(
                safe.chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')),
                "{:?} -> {:?}",
                raw,
                safe
            );
            assert!(!safe.contains('/'));
        }
    }

    #[test]
    fn test_long_names_are_capped_keeping_extension() {
        let long = format!("{}.pdf", "a".repeat(300));
        let safe = sanitize_filename(&long);
        assert_eq!(safe.len(), 100);
        assert!(safe.ends_with("a.pdf"));

        let no_ext = sanitize_filename(&"b".repeat(300));
        assert_eq!(no_ext, "b".repeat(100));

        let odd_ext = sanitize_filename(&format!("x.{}", "c".repeat(200)));
        assert_eq!(odd_ext.len(), 100);
        assert!(odd_ext.starts_with("x."));
    }

    #[test]
    fn test_decode_payload_accepts_data_url_and_bare() {
        assert_eq!(decode_payload("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(
            decode_payload("data:application/pdf;base64,aGVsbG8=").unwrap(),
            b"hello"
        );
        assert_eq!(decode_payload("aGVsbG8").unwrap(), b"hello");
        assert_eq!(decode_payload("aGVs\nbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_payload_rejects_garbage() {
        let err = decode_payload("!!not base64!!").unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_prepare_skips_incomplete_attachments() {
        assert!(prepare(AttachmentRole::Resume, Some("cv.pdf"), None)
            .unwrap()
            .is_none());
        assert!(prepare(AttachmentRole::Resume, None, Some("aGVsbG8="))
            .unwrap()
            .is_none());
        assert!(prepare(AttachmentRole::Other, Some(""), Some("aGVsbG8="))
            .unwrap()
            .is_none());
        let upload = prepare(AttachmentRole::Other, Some("../cv.pdf"), Some("aGVsbG8="))
            .unwrap()
            .unwrap();
        assert_eq!(upload.safe_name, "cv.pdf");
        assert_eq!(upload.bytes, b"hello");
    }

    #[tokio::test]
    async fn test_persist_writes_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path());
        let upload = prepare(AttachmentRole::Resume, Some("../../cv.pdf"), Some("aGVsbG8="))
            .unwrap()
            .unwrap();

        let first = uploads.persist(3, 9, &upload).await.unwrap();
        let second = uploads.persist(3, 9, &upload).await.unwrap();
        assert_ne!(first.path, second.path);
        assert_eq!(first.name, "cv.pdf");

        let file_name = first.path.strip_prefix("/uploads/").unwrap();
        assert!(file_name.contains("_3_9_resume_"));
        assert!(file_name.ends_with("_cv.pdf"));
        let written = std::fs::read(dir.path().join(file_name)).unwrap();
        assert_eq!(written, b"hello");

        uploads.discard(&first).await;
        assert!(!dir.path().join(file_name).exists());
    }

    #[tokio::test]
    async fn test_long_name_persists_within_column_width() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadDir::new(dir.path());
        let name = format!("{}.pdf", "a".repeat(300));
        let upload = prepare(AttachmentRole::Other, Some(&name), Some("aGVsbG8="))
            .unwrap()
            .unwrap();

        let doc = uploads.persist(i32::MAX, i32::MAX, &upload).await.unwrap();
        assert!(doc.path.len() <= 255, "path is {} bytes", doc.path.len());
        assert!(doc.name.len() <= 255);
        assert!(doc.path.ends_with(".pdf"));
        let file_name = doc.path.strip_prefix("/uploads/").unwrap();
        assert_eq!(std::fs::read(dir.path().join(file_name)).unwrap(), b"hello");
    }
}
