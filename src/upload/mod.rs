//! Image upload: validation, decoding and the resulting in-memory handle.
//!
//! ```ignore
//! use veriframe::upload::{load_upload, UploadConfig, UploadFile};
//!
//! let file = UploadFile::new("photo.png", "image/png", bytes);
//! load_upload(file, &UploadConfig::default(), |handle| state.image = Some(handle)).await?;
//! ```

pub mod handle;
pub mod loader;
pub mod validator;

pub use handle::{decode_bytes, ImageHandle};
pub use loader::{decode_upload, load_upload, load_upload_with_clear};
pub use validator::{
    content_type_for_path, validate_content_type, validate_size, validate_upload, UploadConfig,
    UploadFile, IMAGE_CONTENT_TYPE_PREFIX, MAX_UPLOAD_BYTES,
};
