use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::sync::transfer::Transfer;
use crate::errors::TwigError;

impl Repository {
    /// Append the local history to a remote branch
    ///
    /// The remote branch must be an ancestor of the local HEAD, otherwise
    /// nothing is copied. A missing remote branch is created.
    pub async fn push(&mut self, remote: &str, branch: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let stage = self.stage();
        let _stage = stage.lock().await;

        let remote_store = self.remotes().open(remote)?;
        let branch_name = BranchName::try_parse(branch.to_string())?;
        let head_oid = self.refs().read_head()?;

        if let Some(remote_oid) = remote_store.refs().read_branch(&branch_name)?
            && !self.ancestry().is_ancestor(&remote_oid, &head_oid)?
        {
            return Err(TwigError::NeedsPull.into());
        }

        let summary =
            Transfer::new(self.database(), remote_store.database()).copy_reachable(&head_oid)?;
        remote_store.refs().update_branch(&branch_name, &head_oid)?;

        eprintln!(
            "Pushed {} commit(s) and {} blob(s) to {}/{}",
            summary.commits, summary.blobs, remote, branch_name
        );

        Ok(())
    }
}
