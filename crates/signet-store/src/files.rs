//! File storage collaborator
//!
//! Signet never touches PDF bytes beyond upload validation: the blob store
//! holds the original and signed PDFs, and the lifecycle core only passes
//! opaque [`FileRef`]s around. Validation enforces the `%PDF` magic
//! prefix, the 10 MiB ceiling, and the `application/pdf` content type, and
//! deletes the blob when any check fails.

use async_trait::async_trait;
use parking_lot::RwLock;
use signet_types::{FileRef, SignetError, SignetResult};
use std::collections::HashMap;

/// Uploads larger than this are rejected and deleted.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// A stored blob plus the content type it was uploaded with
#[derive(Clone, Debug)]
pub struct StoredFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Blob storage, consumed as an opaque collaborator
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn store(&self, bytes: Vec<u8>, content_type: &str) -> SignetResult<FileRef>;

    /// Download URL for a blob, if it exists.
    async fn url(&self, file: &FileRef) -> SignetResult<Option<String>>;

    async fn fetch(&self, file: &FileRef) -> SignetResult<Option<StoredFile>>;

    async fn delete(&self, file: &FileRef) -> SignetResult<()>;
}

/// Validate a freshly uploaded PDF, deleting the blob on any failure.
///
/// Returns the byte size of the valid upload.
pub async fn validate_pdf_upload(store: &dyn FileStore, file: &FileRef) -> SignetResult<usize> {
    let stored = store
        .fetch(file)
        .await?
        .ok_or_else(|| SignetError::not_found("File"))?;

    if stored.bytes.len() > MAX_UPLOAD_BYTES {
        store.delete(file).await?;
        return Err(SignetError::validation(
            "File too large. Maximum size is 10MB.",
        ));
    }

    if !stored.content_type.contains("application/pdf") {
        store.delete(file).await?;
        return Err(SignetError::validation("Only PDF files are allowed."));
    }

    if stored.bytes.len() < PDF_MAGIC.len() || &stored.bytes[..PDF_MAGIC.len()] != PDF_MAGIC {
        store.delete(file).await?;
        return Err(SignetError::validation("Invalid PDF file."));
    }

    Ok(stored.bytes.len())
}

/// In-memory [`FileStore`] used by the test suite
#[derive(Default)]
pub struct MemoryFileStore {
    files: RwLock<HashMap<FileRef, StoredFile>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn store(&self, bytes: Vec<u8>, content_type: &str) -> SignetResult<FileRef> {
        let file = FileRef(uuid::Uuid::new_v4().to_string());
        self.files.write().insert(
            file.clone(),
            StoredFile {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(file)
    }

    async fn url(&self, file: &FileRef) -> SignetResult<Option<String>> {
        Ok(self
            .files
            .read()
            .contains_key(file)
            .then(|| format!("memory://{file}")))
    }

    async fn fetch(&self, file: &FileRef) -> SignetResult<Option<StoredFile>> {
        Ok(self.files.read().get(file).cloned())
    }

    async fn delete(&self, file: &FileRef) -> SignetResult<()> {
        self.files.write().remove(file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_valid_pdf_passes() {
        let store = MemoryFileStore::new();
        let file = store
            .store(b"%PDF-1.7 content".to_vec(), "application/pdf")
            .await
            .unwrap();
        let size = validate_pdf_upload(&store, &file).await.unwrap();
        assert_eq!(size, 16);
        assert!(store.url(&file).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_wrong_magic_bytes_rejected_and_deleted() {
        let store = MemoryFileStore::new();
        let file = store
            .store(b"GIF89a...".to_vec(), "application/pdf")
            .await
            .unwrap();
        let err = validate_pdf_upload(&store, &file).await.unwrap_err();
        assert!(matches!(err, SignetError::Validation(_)));
        assert!(store.fetch(&file).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wrong_content_type_rejected() {
        let store = MemoryFileStore::new();
        let file = store
            .store(b"%PDF-1.7".to_vec(), "text/plain")
            .await
            .unwrap();
        assert!(validate_pdf_upload(&store, &file).await.is_err());
        assert!(store.fetch(&file).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let store = MemoryFileStore::new();
        let mut bytes = b"%PDF".to_vec();
        bytes.resize(MAX_UPLOAD_BYTES + 1, 0);
        let file = store.store(bytes, "application/pdf").await.unwrap();
        assert!(validate_pdf_upload(&store, &file).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let store = MemoryFileStore::new();
        let err = validate_pdf_upload(&store, &FileRef("nope".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, SignetError::NotFound(_)));
    }
}
