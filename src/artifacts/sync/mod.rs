//! Object transfer between repositories
//!
//! Push and fetch both come down to copying the commits reachable from a tip,
//! together with the blobs they reference, from one content store to another.

pub mod transfer;
