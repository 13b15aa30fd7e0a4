//! Version-control data structures and algorithms
//!
//! - `branch`: Branch name validation
//! - `checkout`: Working tree migration and the untracked file guard
//! - `merge`: Ancestry queries, the three-way case table and conflict markers
//! - `objects`: Object types (blob, commit) and their identity
//! - `stage`: On-disk stage record format
//! - `status`: Working tree status inspection
//! - `sync`: Object transfer between repositories

pub mod branch;
pub mod checkout;
pub mod merge;
pub mod objects;
pub mod stage;
pub mod status;
pub mod sync;
