//! File attachments for notification emails.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::NotifyError;

/// A file attachment.
///
/// Notification images arrive as file paths and are read only when the
/// message is sent, so a camera snapshot written just before the
/// notification fires is picked up in full.
///
/// # Examples
///
/// ```
/// use mailgun_notify::Attachment;
///
/// let attachment = Attachment::from_path("/tmp/snapshot.jpg");
/// assert_eq!(attachment.filename, "snapshot.jpg");
/// assert_eq!(attachment.content_type, "image/jpeg");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Filename for the attachment
    pub filename: String,
    /// MIME content type (e.g., "image/png")
    pub content_type: String,
    /// File path, read at send time
    pub path: String,
}

impl Attachment {
    /// Create an attachment for a file path.
    ///
    /// Nothing is read here and the file is not required to exist yet;
    /// `get_data()` reports a missing file when the message is sent.
    /// Content type is guessed from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("attachment")
            .to_string();

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        Self {
            filename,
            content_type,
            path: path.to_string_lossy().to_string(),
        }
    }

    /// Read the attachment data.
    ///
    /// # Errors
    ///
    /// - `AttachmentFileNotFound` - File path doesn't exist
    /// - `AttachmentReadError` - Failed to read file
    pub fn get_data(&self) -> Result<Vec<u8>, NotifyError> {
        std::fs::read(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NotifyError::AttachmentFileNotFound(self.path.clone())
            } else {
                NotifyError::AttachmentReadError(format!("{}: {}", self.path, e))
            }
        })
    }
}
