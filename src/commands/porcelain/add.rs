use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::Object;

impl Repository {
    /// Stage files for addition
    ///
    /// Directories expand into every file below them. A file whose working
    /// copy matches the HEAD commit ends up with no pending change at all.
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        // resolve every path first so a missing one leaves the stage untouched
        let names = paths
            .iter()
            .map(|path| self.workspace().expand_path(&Workspace::normalize_name(path)))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten();

        let stage = self.stage();
        let mut stage = stage.lock().await;

        // Load the stage file from the disk
        stage.rehydrate()?;

        let (_, head_commit) = self.head_commit()?;

        for name in names {
            let blob = self.workspace().parse_blob(&name)?;
            let blob_id = blob.object_id()?;

            if head_commit.contains(&name, &blob_id) {
                stage.unstage(&name);
            } else if !stage.cancel_removal(&name) {
                self.database().store(&blob)?;
                stage.stage_for_addition(name, blob_id);
            }
        }

        stage.write_updates()?;

        Ok(())
    }
}
