//! In-memory image handle.

use bytes::Bytes;
use image::io::Reader as ImageReader;
use image::DynamicImage;
use sha2::{Digest, Sha256};
use std::io::Cursor;

use crate::export::data_uri;

/// An uploaded image: encoded bytes plus the decoded pixel size.
///
/// The byte buffer is immutable and reference counted, so clones are cheap
/// and nothing downstream can alter the original upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle {
    file_name: String,
    content_type: String,
    data: Bytes,
    width: u32,
    height: u32,
}

impl ImageHandle {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
            width,
            height,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `data:<content-type>;base64,...` form of the original bytes.
    pub fn data_uri(&self) -> String {
        data_uri(&self.content_type, &self.data)
    }

    /// Hex SHA-256 of the encoded bytes.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.data))
    }

    /// Decode the bytes into pixels.
    pub fn decode(&self) -> Result<DynamicImage, String> {
        decode_bytes(&self.data)
    }
}

impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandle")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.data.len())
            .field("dimensions", &(self.width, self.height))
            .finish()
    }
}

/// Decode image data, guessing the format from its magic bytes.
pub fn decode_bytes(data: &[u8]) -> Result<DynamicImage, String> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| e.to_string())?
        .decode()
        .map_err(|e| e.to_string())
}
