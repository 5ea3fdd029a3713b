//! Asynchronous upload loading.
//!
//! Validates the declared metadata, decodes the bytes on the blocking pool
//! and hands the resulting [`ImageHandle`] to a caller-supplied setter. When
//! decoding fails nothing is set or cleared.

use super::handle::{decode_bytes, ImageHandle};
use super::validator::{validate_upload, UploadConfig, UploadFile};
use crate::error::AppError;

/// Validate and decode an upload into a handle.
pub async fn decode_upload(file: UploadFile, config: &UploadConfig) -> Result<ImageHandle, AppError> {
    if let Err(e) = validate_upload(&file, config) {
        tracing::warn!(
            file = %file.name,
            content_type = %file.content_type,
            size = file.size(),
            error = %e,
            "Upload rejected"
        );
        return Err(e.into());
    }

    let UploadFile {
        name,
        content_type,
        data,
    } = file;

    let (width, height, data) = tokio::task::spawn_blocking(move || {
        decode_bytes(&data).map(|img| (img.width(), img.height(), data))
    })
    .await
    .map_err(|e| AppError::Decode(format!("decode task failed: {}", e)))?
    .map_err(|e| AppError::Decode(format!("{}: {}", name, e)))?;

    let handle = ImageHandle::new(name, content_type, data, width, height);

    tracing::info!(
        file = %handle.file_name(),
        content_type = %handle.content_type(),
        size = handle.len(),
        width = width,
        height = height,
        fingerprint = %handle.fingerprint(),
        "Upload accepted"
    );

    Ok(handle)
}

/// Load an upload and pass the handle to `set`.
pub async fn load_upload<S>(file: UploadFile, config: &UploadConfig, set: S) -> Result<(), AppError>
where
    S: FnOnce(ImageHandle),
{
    let handle = decode_upload(file, config).await?;
    set(handle);
    Ok(())
}

/// Like [`load_upload`], but calls `clear` right before the handle is
/// replaced so results derived from the previous image can be dropped.
pub async fn load_upload_with_clear<S, C>(
    file: UploadFile,
    config: &UploadConfig,
    set: S,
    clear: C,
) -> Result<(), AppError>
where
    S: FnOnce(ImageHandle),
    C: FnOnce(),
{
    let handle = decode_upload(file, config).await?;
    clear();
    set(handle);
    Ok(())
}
