use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::errors::TwigError;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(TwigError::AlreadyInitialized.into());
        }

        self.database()
            .create_layout()
            .context("Failed to create .twig/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .twig/refs/heads directory")?;

        let initial_commit_id = self
            .database()
            .store(&Commit::initial())
            .context("Failed to store the initial commit")?;

        let default_branch = BranchName::default_branch();
        self.refs()
            .create_branch(&default_branch, &initial_commit_id)
            .context("Failed to create the default branch")?;
        self.refs()
            .set_active(&default_branch)
            .context("Failed to create initial HEAD reference")?;

        writeln!(
            self.writer(),
            "Initialized empty twig repository in {}",
            self.metadata_path().display()
        )?;

        Ok(())
    }
}
