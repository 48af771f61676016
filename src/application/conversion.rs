//! Binary conversion of raw audio sources into storable buffers

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::ports::StoreError;

/// Read a raw binary source to the end, once, into an owned buffer.
///
/// Fails with `StoreError::ConversionError` if the source cannot be read.
pub async fn to_buffer<R>(mut source: R) -> Result<Vec<u8>, StoreError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut buffer = Vec::new();
    source
        .read_to_end(&mut buffer)
        .await
        .map_err(|e| StoreError::ConversionError(e.to_string()))?;

    log::debug!("Converted audio source into {} byte buffer", buffer.len());
    Ok(buffer)
}

/// Convert the contents of a file into a buffer
pub async fn file_to_buffer(path: &Path) -> Result<Vec<u8>, StoreError> {
    let file = File::open(path)
        .await
        .map_err(|e| StoreError::ConversionError(format!("{}: {}", path.display(), e)))?;

    to_buffer(file).await
}
