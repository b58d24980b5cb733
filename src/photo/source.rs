/// Image acquisition
///
/// Turns a user-supplied file into a transferable `ImagePayload`
/// (a self-describing data URI). Validation happens here, before the
/// workflow ever sees the image.

use base64::Engine;
use image::ImageFormat;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task;
use tracing::{debug, info};

/// Largest accepted upload (10 MiB)
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Header bytes read for content sniffing
const SNIFF_BYTES: u64 = 64;

/// Why a file was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please upload an image file")]
    NotAnImage { media_type: String },

    #[error("Image must be less than 10MB")]
    TooLarge { size: u64 },

    #[error("Failed to read file")]
    ReadFailure(String),
}

/// A file as handed over by the picker or a drop, before validation
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl RawFile {
    /// Read a file from disk and work out its media type
    ///
    /// Type and size are checked against the file header and metadata
    /// first, so a rejected file is never read in full.
    pub fn read(path: &Path) -> Result<Self, ValidationError> {
        let read_error =
            |e: std::io::Error| ValidationError::ReadFailure(format!("{}: {}", path.display(), e));

        let mut file = File::open(path).map_err(read_error)?;
        let size = file.metadata().map_err(read_error)?.len();

        let mut header = Vec::with_capacity(SNIFF_BYTES as usize);
        (&mut file)
            .take(SNIFF_BYTES)
            .read_to_end(&mut header)
            .map_err(read_error)?;
        let media_type = media_type_of(path, &header);
        check(&media_type, size)?;

        let mut bytes = header;
        bytes.reserve(size.saturating_sub(SNIFF_BYTES) as usize);
        file.read_to_end(&mut bytes).map_err(read_error)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(RawFile {
            media_type,
            size: bytes.len() as u64,
            name,
            bytes,
        })
    }
}

/// The type and size rules shared by disk reads and `select_image`
fn check(media_type: &str, size: u64) -> Result<(), ValidationError> {
    if !media_type.starts_with("image/") {
        return Err(ValidationError::NotAnImage {
            media_type: media_type.to_string(),
        });
    }
    if size > MAX_IMAGE_BYTES {
        return Err(ValidationError::TooLarge { size });
    }
    Ok(())
}

/// Validated, encoded image ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    name: String,
    media_type: String,
    size: u64,
    data_uri: String,
    bytes: Vec<u8>,
}

impl ImagePayload {
    /// `data:<media type>;base64,<bytes>`
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Declared size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Original file contents, used for the on-screen preview
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Validate a raw file and encode it as a data URI
///
/// The media type must be an `image/*` type and the size must not exceed
/// [`MAX_IMAGE_BYTES`]. Nothing is produced on failure.
pub fn select_image(file: RawFile) -> Result<ImagePayload, ValidationError> {
    check(&file.media_type, file.size)?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&file.bytes);
    let data_uri = format!("data:{};base64,{}", file.media_type, encoded);

    debug!(
        "Encoded {} ({}, {} bytes) as data URI",
        file.name, file.media_type, file.size
    );

    Ok(ImagePayload {
        name: file.name,
        media_type: file.media_type,
        size: file.size,
        data_uri,
        bytes: file.bytes,
    })
}

/// Read and validate an image file off the UI thread
pub async fn load_image(path: PathBuf) -> Result<ImagePayload, ValidationError> {
    task::spawn_blocking(move || {
        let file = RawFile::read(&path)?;
        let payload = select_image(file)?;
        info!("📷 Loaded {} ({} KB)", path.display(), payload.size() / 1024);
        Ok(payload)
    })
    .await
    .map_err(|e| ValidationError::ReadFailure(format!("Task join error: {}", e)))?
}

/// Best guess at a file's media type: extension first, then content
fn media_type_of(path: &Path, bytes: &[u8]) -> String {
    ImageFormat::from_path(path)
        .or_else(|_| image::guess_format(bytes))
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| "application/octet-stream".to_string())
}
