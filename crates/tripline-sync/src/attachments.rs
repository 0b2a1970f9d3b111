//! Attachment store seam
//!
//! Uploads are size-gated before they leave the client: oversize input
//! is a rejection, never a silent truncation. The store itself is an
//! external collaborator behind a trait.

use crate::store::StoreError;
use async_trait::async_trait;
use tripline_model::{ItemId, TripId, ValidationError};

/// Upload size limit
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Raw bytes
    pub bytes: Vec<u8>,
    /// MIME type reported by the picker
    pub mime_type: String,
    /// Name shown to collaborators
    pub display_name: String,
}

impl FileUpload {
    /// Reject oversize uploads up front
    ///
    /// # Errors
    /// [`ValidationError::AttachmentTooLarge`] past [`MAX_ATTACHMENT_BYTES`].
    pub fn check_size(&self) -> Result<(), ValidationError> {
        if self.bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(ValidationError::AttachmentTooLarge {
                size: self.bytes.len(),
                limit: MAX_ATTACHMENT_BYTES,
            });
        }
        Ok(())
    }
}

/// A stored file as reported back by the attachment store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAttachment {
    /// Where the file now lives
    pub url: String,
    /// Stored name
    pub name: String,
    /// Stored MIME type
    pub mime_type: String,
    /// Stored size in bytes
    pub size: usize,
}

/// External file storage seam
#[async_trait]
pub trait AttachmentStore: Send + Sync + 'static {
    /// Upload a file scoped to a trip and item
    async fn upload(
        &self,
        file: &FileUpload,
        trip: TripId,
        item: ItemId,
    ) -> Result<StoredAttachment, StoreError>;

    /// Delete a previously stored file
    async fn delete(&self, url: &str) -> Result<(), StoreError>;
}
