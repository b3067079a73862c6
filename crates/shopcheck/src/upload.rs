//! File payloads for `<input type="file">` uploads.
//!
//! Contents travel to the page base64-encoded and are rebuilt there as a
//! `File` inside a `DataTransfer`, so no file needs to exist on disk.

use crate::result::ShopcheckResult;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A file to attach to a file input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePayload {
    /// File name
    pub name: String,
    /// MIME type
    pub mime_type: String,
    /// File contents
    pub contents: Vec<u8>,
}

impl FilePayload {
    /// Create a payload with an explicit MIME type
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            contents,
        }
    }

    /// Create a payload, guessing the MIME type from the file name
    #[must_use]
    pub fn guessed(name: impl Into<String>, contents: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self::new(name, mime_type, contents)
    }

    /// Create a text file
    #[must_use]
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, "text/plain", content.into().into_bytes())
    }

    /// Read a file from disk
    pub fn from_path(path: impl AsRef<Path>) -> ShopcheckResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::guessed(name, contents))
    }

    /// Size in bytes
    #[must_use]
    pub fn size(&self) -> usize {
        self.contents.len()
    }

    /// Descriptor consumed by the in-page upload script
    #[must_use]
    pub fn to_js_descriptor(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "type": self.mime_type,
            "b64": base64::engine::general_purpose::STANDARD.encode(&self.contents),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_text_payload() {
        let file = FilePayload::text("test.txt", "this is test data");
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(file.size(), 17);
    }

    #[test]
    fn test_guessed_mime_types() {
        assert!(FilePayload::guessed("malware.js", b"x".to_vec())
            .mime_type
            .ends_with("javascript"));
        assert_eq!(
            FilePayload::guessed("photo.png", vec![]).mime_type,
            "image/png"
        );
        assert_eq!(
            FilePayload::guessed("blob", vec![]).mime_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_descriptor_is_base64() {
        let file = FilePayload::text("a.txt", "hi");
        let descriptor = file.to_js_descriptor();
        assert_eq!(descriptor["name"], "a.txt");
        assert_eq!(descriptor["type"], "text/plain");
        assert_eq!(descriptor["b64"], "aGk=");
    }

    #[test]
    fn test_from_path_reads_contents() {
        let mut tmp = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        tmp.write_all(b"payload").unwrap();
        let file = FilePayload::from_path(tmp.path()).unwrap();
        assert_eq!(file.contents, b"payload");
        assert_eq!(file.mime_type, "text/plain");
        assert!(file.name.ends_with(".txt"));
    }
}
