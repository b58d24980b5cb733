/// Transform service module
///
/// This module handles:
/// - The JSON wire format of the transform endpoint (models.rs)
/// - Sending requests and normalizing responses (client.rs)
/// - Turning failures into typed, UI-ready descriptors (classify.rs)

pub mod models;
pub mod client;
pub mod classify;

pub use classify::{classify, ErrorDescriptor, ErrorKind};
pub use client::{RawFailure, TransformClient, TransformRequest, TransformSuccess};
