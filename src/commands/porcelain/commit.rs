use crate::areas::repository::Repository;
use crate::areas::stage::Stage;
use crate::artifacts::objects::commit::{Commit, FileTable, Parents};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use std::io::Write;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        if message.trim().is_empty() {
            return Err(TwigError::EmptyMessage.into());
        }

        let stage = self.stage();
        let mut stage = stage.lock().await;

        // Load the stage file from the disk
        stage.rehydrate()?;

        if stage.is_empty() {
            return Err(TwigError::NothingToCommit.into());
        }

        let (head_oid, head_commit) = self.head_commit()?;
        let commit_id = self.write_commit(
            message.to_string(),
            Parents::Single(head_oid),
            head_commit.files(),
            &mut stage,
        )?;

        stage.write_updates()?;

        writeln!(
            self.writer(),
            "[{} {}] {}",
            self.refs().active_branch()?,
            commit_id.to_short_oid(),
            message
        )?;

        Ok(())
    }

    /// Store a commit of `base` with the staged edits applied and advance
    /// the active branch to it
    ///
    /// The stage is cleared in memory; persisting it is up to the caller.
    pub(crate) fn write_commit(
        &self,
        message: String,
        parents: Parents,
        base: &FileTable,
        stage: &mut Stage,
    ) -> anyhow::Result<ObjectId> {
        let commit = Commit::process_stage(
            message,
            Commit::timestamp_from_env(),
            parents,
            base,
            stage,
        )?;

        let commit_id = self.database().store(&commit)?;
        self.refs().advance_active(&commit_id)?;

        Ok(commit_id)
    }
}
