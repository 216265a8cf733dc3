//! In-memory attachment held for the duration of one request

use bytes::Bytes;

/// A case file: its name and raw content
#[derive(Debug, Clone)]
pub struct Attachment {
    /// File name (last path segment of the object name)
    pub file_name: String,
    /// Raw file content
    pub bytes: Bytes,
}

impl Attachment {
    /// Create a new attachment
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Build an attachment from a stored object, keeping only the file name
    pub fn from_object(object_name: &str, bytes: impl Into<Bytes>) -> Self {
        let file_name = object_name.rsplit('/').next().unwrap_or(object_name);
        Self::new(file_name, bytes)
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
