/// State management module
///
/// This module handles all application state:
/// - The transformation workflow state machine (workflow.rs)
/// - The small SQLite settings store that outlives a session (store.rs)

pub mod workflow;
pub mod store;
