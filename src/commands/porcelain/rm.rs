use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::errors::TwigError;

impl Repository {
    /// Unstage a pending addition, or stop tracking a committed file
    ///
    /// A file tracked by HEAD is staged for removal and deleted from the
    /// working tree if it is still there.
    pub async fn remove(&mut self, file: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let name = Workspace::normalize_name(file);

        let stage = self.stage();
        let mut stage = stage.lock().await;

        stage.rehydrate()?;

        if !stage.cancel_addition(&name) {
            let (_, head_commit) = self.head_commit()?;
            let blob_id = head_commit
                .blob_id(&name)
                .ok_or_else(|| TwigError::NothingToRemove(name.clone()))?;

            stage.stage_for_removal(name.clone(), blob_id.clone());
            self.workspace().remove_file(&name)?;
        }

        stage.write_updates()?;

        Ok(())
    }
}
