/// Transformed image handling
///
/// Decoding the service's base64 result, probing it for display, and
/// writing it to disk when the user downloads it.

use base64::Engine;
use chrono::Utc;
use image::ImageFormat;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("invalid base64 image data: {0}")]
    Base64(String),

    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("could not write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Task join error: {0}")]
    Join(String),
}

/// Basic facts about a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

/// Decode base64 image data, with or without a `data:` prefix
pub fn decode_image_data(data: &str) -> Result<Vec<u8>, SaveError> {
    let encoded = if data.starts_with("data:") {
        data.split_once(',').map(|(_, body)| body).unwrap_or(data)
    } else {
        data
    };

    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| SaveError::Base64(e.to_string()))
}

/// Probe dimensions and format without keeping the decoded pixels around
pub fn inspect(bytes: &[u8]) -> Result<ImageInfo, SaveError> {
    let format = image::guess_format(bytes).map_err(|e| SaveError::Decode(e.to_string()))?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| SaveError::Decode(e.to_string()))?;

    Ok(ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
    })
}

/// Suggested download name, e.g. `emoji-face-1718000000000.jpg`
pub fn default_file_name() -> String {
    format!("emoji-face-{}.jpg", Utc::now().timestamp_millis())
}

/// Folder offered first in the save dialog
pub fn default_output_dir() -> Option<PathBuf> {
    dirs::picture_dir()
        .or_else(dirs::download_dir)
        .or_else(dirs::home_dir)
}

/// Write the transformed image to `path`
///
/// The output format follows the target extension; unknown extensions
/// get the bytes as delivered.
pub async fn save_transformed(bytes: Vec<u8>, path: PathBuf) -> Result<PathBuf, SaveError> {
    tokio::task::spawn_blocking(move || save_transformed_blocking(&bytes, path))
        .await
        .map_err(|e| SaveError::Join(e.to_string()))?
}

fn save_transformed_blocking(bytes: &[u8], path: PathBuf) -> Result<PathBuf, SaveError> {
    let write_error = |message: String| SaveError::Write {
        path: path.clone(),
        message,
    };

    match ImageFormat::from_path(&path) {
        Ok(target) if image::guess_format(bytes).ok() != Some(target) => {
            let img = image::load_from_memory(bytes).map_err(|e| SaveError::Decode(e.to_string()))?;
            // JPEG has no alpha channel
            let img = if target == ImageFormat::Jpeg {
                image::DynamicImage::ImageRgb8(img.to_rgb8())
            } else {
                img
            };
            img.save_with_format(&path, target)
                .map_err(|e| write_error(e.to_string()))?;
        }
        _ => {
            std::fs::write(&path, bytes).map_err(|e| write_error(e.to_string()))?;
        }
    }

    info!("💾 Saved transformed image to {}", path.display());
    Ok(path)
}
