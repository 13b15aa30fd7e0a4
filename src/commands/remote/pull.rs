use crate::areas::repository::Repository;
use crate::commands::porcelain::merge::MergeOutcome;

impl Repository {
    /// Fetch a remote branch, then merge its tracking branch into the active
    /// one
    pub async fn pull(&mut self, remote: &str, branch: &str) -> anyhow::Result<MergeOutcome> {
        self.fetch(remote, branch).await?;

        self.merge(&format!("{}/{}", remote, branch)).await
    }
}
