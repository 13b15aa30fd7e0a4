//! Command implementations
//!
//! Commands are `impl Repository` blocks, grouped in two categories:
//!
//! - `porcelain`: Local version control workflows (add, commit, checkout, merge, ...)
//! - `remote`: Remote registry and synchronization (push, fetch, pull)

pub mod porcelain;
pub mod remote;
