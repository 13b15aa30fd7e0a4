use crate::areas::repository::Repository;

impl Repository {
    /// Register the metadata directory of another repository under a name
    pub async fn add_remote(&mut self, name: &str, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        self.remotes().add(name, path)
    }

    pub async fn remove_remote(&mut self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        self.remotes().remove(name)
    }
}
