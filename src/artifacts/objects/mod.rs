//! Stored object types
//!
//! Two kinds of object live in the content store:
//!
//! - **Blob**: raw file content
//! - **Commit**: a full snapshot (file name to blob id table) plus message,
//!   timestamp and parent commit ids
//!
//! Both serialize as `<type> <size>\0<content>` and are identified by the
//! SHA-1 of that serialization.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in binary format
pub const OBJECT_ID_BYTES: usize = OBJECT_ID_LENGTH / 2;
