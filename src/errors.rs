//! User-facing failure kinds
//!
//! Every precondition a command can violate is one variant of [`TwigError`].
//! Commands return `anyhow::Result`, so callers recover the kind with
//! `error.downcast_ref::<TwigError>()`. Anything that does not downcast is an
//! unexpected I/O or corruption failure.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TwigError {
    #[error("A twig version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Not in an initialized twig directory.")]
    NotInitialized,

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("File does not exist.")]
    FileNotFound(String),

    #[error("File does not exist in that commit.")]
    FileNotInCommit(String),

    #[error("No reason to remove the file.")]
    NothingToRemove(String),

    #[error("A branch with that name already exists.")]
    BranchExists(String),

    #[error("No such branch exists.")]
    NoSuchBranch(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("Cannot remove the current branch.")]
    CannotDeleteActive(String),

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch(String),

    #[error("No commit with that id exists.")]
    NoSuchCommit(String),

    #[error("Commit id {0} is ambiguous.")]
    AmbiguousCommit(String),

    #[error("Found no commit with that message.")]
    NoCommitWithMessage(String),

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileConflict(Vec<String>),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,

    #[error("Given branch is an ancestor of the current branch.")]
    MergeNotNeeded,

    #[error("A remote with that name already exists.")]
    RemoteExists(String),

    #[error("A remote with that name does not exist.")]
    RemoteNotFound(String),

    #[error("Remote directory not found.")]
    RemoteDirectoryNotFound(String),

    #[error("That remote does not have that branch.")]
    NoSuchRemoteBranch(String),

    #[error("Please pull down remote changes before pushing.")]
    NeedsPull,
}

/// Extract the failure kind of a command error, if it is a user error.
pub fn kind_of(error: &anyhow::Error) -> Option<&TwigError> {
    error.downcast_ref::<TwigError>()
}
