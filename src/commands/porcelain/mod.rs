//! Porcelain commands (user-facing version control operations)
//!
//! Every command is an `async` method on [`Repository`](crate::areas::repository::Repository)
//! that checks its preconditions before touching the working tree, the stage
//! or any ref, and writes its report to the repository writer.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add` / `rm`: Stage files for addition or removal
//! - `commit`: Create a new commit from the stage
//! - `log`: Show first-parent history, every commit, or commits by message
//! - `status`: Show branches, the stage and the working tree state
//! - `checkout`: Switch branches or restore files
//! - `branch`: Create or delete branches
//! - `reset`: Move the active branch to another commit
//! - `merge`: Merge another branch into the active one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
