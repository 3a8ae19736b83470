//! Image payloads carried as data URIs

use std::sync::OnceLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;

use crate::error::{Error, Result};

/// Largest accepted decoded image (5 MiB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

fn data_uri_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^data:(?P<mime>[a-zA-Z0-9.+-]+/[a-zA-Z0-9.+-]+)(?:;[^,;]+)*;base64,(?P<data>.*)$")
            .expect("data URI pattern is valid")
    })
}

/// A validated image, stored as the data URI that ends up on the entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    data_uri: String,
    mime: String,
    byte_len: usize,
}

impl ImagePayload {
    /// Parse and validate a `data:image/...;base64,...` URI
    pub fn from_data_uri(data_uri: impl Into<String>) -> Result<Self> {
        let data_uri = data_uri.into();
        let caps = data_uri_pattern()
            .captures(&data_uri)
            .ok_or_else(|| Error::InvalidImage("Not a base64 data URI".to_string()))?;

        let mime = caps["mime"].to_lowercase();
        let bytes = STANDARD
            .decode(caps["data"].trim())
            .map_err(|e| Error::InvalidImage(format!("Invalid base64 data: {}", e)))?;

        Self::check(&mime, bytes.len())?;
        let byte_len = bytes.len();

        Ok(Self {
            data_uri,
            mime,
            byte_len,
        })
    }

    /// Encode raw image bytes into a data URI payload
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Result<Self> {
        let mime = mime.to_lowercase();
        Self::check(&mime, bytes.len())?;

        Ok(Self {
            data_uri: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
            mime,
            byte_len: bytes.len(),
        })
    }

    fn check(mime: &str, byte_len: usize) -> Result<()> {
        if !mime.starts_with("image/") {
            return Err(Error::InvalidImage(format!(
                "Please upload an image file (got {})",
                mime
            )));
        }
        if byte_len > MAX_IMAGE_BYTES {
            return Err(Error::InvalidImage(
                "Please upload an image smaller than 5MB".to_string(),
            ));
        }
        Ok(())
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Decoded image size in bytes
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn into_data_uri(self) -> String {
        self.data_uri
    }
}

/// Guess an image MIME type from a file extension
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
