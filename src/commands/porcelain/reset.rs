use crate::areas::repository::Repository;

impl Repository {
    /// Check out an arbitrary commit and move the active branch to it
    pub async fn reset(&mut self, revision: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let target_oid = self.database().resolve_commit(revision)?;

        let stage = self.stage();
        let mut stage = stage.lock().await;

        stage.rehydrate()?;

        self.switch_snapshot(&target_oid, &mut stage)?;
        self.refs().advance_active(&target_oid)?;

        stage.write_updates()?;

        Ok(())
    }
}
