//! Stage file format
//!
//! The stage records pending changes for the next commit.
//!
//! ## File Format (Version 1)
//!
//! ```text
//! Header (16 bytes):
//!   - Signature: "TWST" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Pending additions count (4 bytes)
//!   - Pending removals count (4 bytes)
//!
//! Entries (variable length), additions first:
//!   - Blob ID (20 bytes)
//!   - Name length (2 bytes)
//!   - Name (UTF-8)
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod stage_entry;
pub mod stage_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of stage header in bytes
pub const HEADER_SIZE: usize = 16;

/// Magic signature identifying stage files
pub const SIGNATURE: &str = "TWST";

/// Stage file format version
pub const VERSION: u32 = 1;
