use crate::areas::repository::Repository;
use crate::areas::stage::Stage;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;

impl Repository {
    /// Restore a file to its version in the HEAD commit
    ///
    /// The stage is left unchanged.
    pub async fn checkout_file(&mut self, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let head_oid = self.refs().read_head()?;

        self.restore_file(&head_oid, file)
    }

    /// Restore a file to its version in the commit named by a full or
    /// abbreviated ID
    pub async fn checkout_file_from(&mut self, revision: &str, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let commit_id = self.database().resolve_commit(revision)?;

        self.restore_file(&commit_id, file)
    }

    pub async fn checkout_branch(&mut self, target: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let (branch_name, target_oid) = self.existing_branch(target)?;
        if self.refs().is_active_branch(&branch_name)? {
            return Err(TwigError::AlreadyOnBranch(target.to_string()).into());
        }

        let stage = self.stage();
        let mut stage = stage.lock().await;

        stage.rehydrate()?;

        self.switch_snapshot(&target_oid, &mut stage)?;
        self.refs().set_active(&branch_name)?;

        stage.write_updates()?;

        eprintln!("Switched to branch '{}'", branch_name);

        Ok(())
    }

    /// Move the working tree from the HEAD snapshot to another commit's and
    /// clear the stage
    ///
    /// Refs are left alone. Nothing is written when an untracked file is in
    /// the way.
    pub(crate) fn switch_snapshot(
        &self,
        target_oid: &ObjectId,
        stage: &mut Stage,
    ) -> anyhow::Result<Commit> {
        let (_, head_commit) = self.head_commit()?;
        let target_commit = self.database().parse_commit(target_oid)?;

        let mut migration = Migration::new(self, head_commit.files(), target_commit.files());
        migration.apply_changes()?;

        stage.clear();

        Ok(target_commit)
    }

    fn restore_file(&self, commit_id: &ObjectId, file: &str) -> anyhow::Result<()> {
        let name = Workspace::normalize_name(file);
        let commit = self.database().parse_commit(commit_id)?;

        let blob_id = commit
            .blob_id(&name)
            .ok_or_else(|| TwigError::FileNotInCommit(name.clone()))?;
        let blob = self.database().parse_blob(blob_id)?;

        self.workspace().write_file(&name, blob.content())
    }
}
