/// Photo handling module
///
/// This module handles:
/// - Reading, validating and encoding user images (source.rs)
/// - Decoding, probing and saving transformed results (output.rs)

pub mod source;
pub mod output;

pub use source::{load_image, ImagePayload, ValidationError};
