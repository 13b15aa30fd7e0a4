use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::sync::transfer::Transfer;
use crate::errors::TwigError;

impl Repository {
    /// Copy a remote branch's history into the local `<remote>/<branch>`
    /// branch
    ///
    /// The working tree, the stage and the active branch are untouched.
    pub async fn fetch(&mut self, remote: &str, branch: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let stage = self.stage();
        let _stage = stage.lock().await;

        let remote_store = self.remotes().open(remote)?;
        let no_such_remote_branch = || TwigError::NoSuchRemoteBranch(branch.to_string());

        let branch_name =
            BranchName::try_parse(branch.to_string()).map_err(|_| no_such_remote_branch())?;
        let remote_oid = remote_store
            .refs()
            .read_branch(&branch_name)?
            .ok_or_else(no_such_remote_branch)?;

        let summary =
            Transfer::new(remote_store.database(), self.database()).copy_reachable(&remote_oid)?;

        let tracking_branch = BranchName::tracking(remote, &branch_name)?;
        self.refs().update_branch(&tracking_branch, &remote_oid)?;

        eprintln!(
            "Fetched {} commit(s) and {} blob(s) into {}",
            summary.commits, summary.blobs, tracking_branch
        );

        Ok(())
    }
}
