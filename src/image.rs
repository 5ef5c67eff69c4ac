// ABOUTME: Screenshot loading and encoding for model transmission
// ABOUTME: Sniffs the raster format from magic bytes and produces a base64 data URI
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image attachment handling
//!
//! Reads the wearable-device screenshot from disk, verifies it is a supported
//! raster format, and encodes it as a `data:` URI for inline transmission in
//! the model request. All failures here surface before any network call.

use base64::{engine::general_purpose, Engine as _};
use std::path::Path;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Supported raster image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG (typical for phone screenshots)
    Png,
    /// JPEG
    Jpeg,
    /// WebP
    Webp,
    /// GIF
    Gif,
}

impl ImageFormat {
    /// MIME type for the data URI
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// Detect the format from the file's leading magic bytes
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else if bytes.starts_with(b"GIF8") {
            Some(Self::Gif)
        } else {
            None
        }
    }
}

/// An image read from disk and encoded for transmission
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    /// Detected raster format
    pub format: ImageFormat,
    /// Base64-encoded file contents
    pub base64_data: String,
}

impl ImageAttachment {
    /// Read and encode an image file
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] with `InvalidInput` if the file is missing,
    /// unreadable, empty, or not a supported raster format.
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::invalid_input(format!("cannot read image {}: {e}", path.display()))
        })?;

        Self::from_bytes(&bytes).map_err(|e| {
            AppError::invalid_input(format!("{}: {}", path.display(), e.message))
        })
    }

    /// Encode in-memory image bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the bytes are empty or the format is not
    /// recognized.
    pub fn from_bytes(bytes: &[u8]) -> AppResult<Self> {
        if bytes.is_empty() {
            return Err(AppError::invalid_input("image file is empty"));
        }

        let format = ImageFormat::sniff(bytes).ok_or_else(|| {
            AppError::invalid_input("unsupported image format (expected PNG, JPEG, WebP, or GIF)")
        })?;

        debug!("Encoded {} image ({} bytes)", format.mime_type(), bytes.len());

        Ok(Self {
            format,
            base64_data: general_purpose::STANDARD.encode(bytes),
        })
    }

    /// Render as a `data:` URI for inline attachment
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.base64_data)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_sniff_known_formats() {
        assert_eq!(ImageFormat::sniff(PNG_HEADER), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::sniff(b"RIFF\x00\x00\x00\x00WEBPVP8 "),
            Some(ImageFormat::Webp)
        );
        assert_eq!(ImageFormat::sniff(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"not an image"), None);
    }

    #[test]
    fn test_data_uri_prefix() {
        let attachment = ImageAttachment::from_bytes(PNG_HEADER).expect("valid png header");
        assert!(attachment.data_uri().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_rejects_empty_and_unknown() {
        assert!(ImageAttachment::from_bytes(&[]).is_err());
        assert!(ImageAttachment::from_bytes(b"plain text").is_err());
    }
}
