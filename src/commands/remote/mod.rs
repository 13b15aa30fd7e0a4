//! Remote commands
//!
//! A remote is another repository's `.twig` directory on the local file
//! system, registered under a name in `.twig/remotes`.
//!
//! - `registry`: Add and remove remotes
//! - `push`: Copy local history into a remote branch
//! - `fetch`: Copy a remote branch into the `<remote>/<branch>` tracking branch
//! - `pull`: Fetch, then merge the tracking branch

pub mod fetch;
pub mod pull;
pub mod push;
pub mod registry;
