/// Startup configuration
///
/// Parsed once from the command line and environment, then read-only for
/// the rest of the process.

use clap::Parser;
use reqwest::Url;
use std::path::PathBuf;

use crate::state::store::Store;

/// Hosted transform service used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://emobanana.guitaripod.workers.dev";

/// Emoji Face - restyle the facial expression in a photo with an emoji
#[derive(Debug, Clone, Parser)]
#[command(name = "emoji-face")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Base URL of the transform service
    #[arg(long, env = "EMOJI_FACE_API_URL", default_value = DEFAULT_API_URL, value_parser = parse_api_url)]
    pub api_url: Url,

    /// Directory holding the settings database (default: platform data dir)
    #[arg(long, env = "EMOJI_FACE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Where the settings database lives, None if no location is known
    pub fn store_path(&self) -> Option<PathBuf> {
        match &self.data_dir {
            Some(dir) => Some(dir.join("emoji_face.db")),
            None => Store::default_path(),
        }
    }
}

fn parse_api_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL {raw:?}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme {other:?}, expected http or https")),
    }
}
