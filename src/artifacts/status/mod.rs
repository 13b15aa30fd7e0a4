//! Working tree status inspection
//!
//! Compares the working directory against the stage and the HEAD commit.
//!
//! ## Components
//!
//! - `file_change`: Enum types for categorizing changes
//! - `status_info`: Status information aggregation

pub mod file_change;
pub mod status_info;
