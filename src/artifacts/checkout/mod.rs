//! Checkout operations
//!
//! Switching the working tree from one snapshot to another by:
//! - Refusing to overwrite untracked files
//! - Planning file writes and deletions
//! - Executing them only once every check has passed

pub mod migration;
