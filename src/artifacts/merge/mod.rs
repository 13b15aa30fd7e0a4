//! Three-way merge
//!
//! - `ancestry`: ancestor test and split point search
//! - `resolution`: per-file case table over split, current and given snapshots
//! - `conflict`: conflict marker file contents

pub mod ancestry;
pub mod conflict;
pub mod resolution;
