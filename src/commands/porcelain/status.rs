use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::StageChangeType;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use std::io::Write;

impl Repository {
    pub async fn status(&mut self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let stage = self.stage();
        let mut stage = stage.lock().await;
        stage.rehydrate()?;

        let status = Status::new(self).initialize(&stage)?;

        self.print_status(&status)
    }

    fn print_status(&self, status: &StatusInfo) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "=== Branches ===")?;
        for branch in &status.branches {
            if branch == &status.active_branch {
                writeln!(writer, "*{}", branch)?;
            } else {
                writeln!(writer, "{}", branch)?;
            }
        }

        writeln!(writer, "\n=== Staged Files ===")?;
        for file in &status.staged_files {
            writeln!(writer, "{}", StageChangeType::Added.paint(file))?;
        }

        writeln!(writer, "\n=== Removed Files ===")?;
        for file in &status.removed_files {
            writeln!(writer, "{}", StageChangeType::Removed.paint(file))?;
        }

        writeln!(writer, "\n=== Modifications Not Staged For Commit ===")?;
        for (file, change) in &status.workspace_changeset {
            writeln!(writer, "{} {}", file, change)?;
        }

        writeln!(writer, "\n=== Untracked Files ===")?;
        for file in &status.untracked_files {
            writeln!(writer, "{}", file)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
