use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, Parents};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::TwigError;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// First-parent history from HEAD back to the initial commit
    pub async fn log(&mut self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut next_oid = Some(self.refs().read_head()?);
        while let Some(commit_id) = next_oid {
            let commit = self.database().parse_commit(&commit_id)?;
            self.show_commit(&commit_id, &commit)?;

            next_oid = commit.parent().cloned();
        }

        Ok(())
    }

    /// Every commit ever made, in store order
    pub async fn global_log(&mut self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        for commit_id in self.database().list(ObjectType::Commit)? {
            let commit = self.database().parse_commit(&commit_id)?;
            self.show_commit(&commit_id, &commit)?;
        }

        Ok(())
    }

    /// IDs of every commit with exactly this message
    pub async fn find(&mut self, message: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut found = Vec::new();
        for commit_id in self.database().list(ObjectType::Commit)? {
            if self.database().parse_commit(&commit_id)?.message() == message {
                found.push(commit_id);
            }
        }

        if found.is_empty() {
            return Err(TwigError::NoCommitWithMessage(message.to_string()).into());
        }

        let mut writer = self.writer();
        for commit_id in found {
            writeln!(writer, "{}", commit_id)?;
        }

        Ok(())
    }

    fn show_commit(&self, commit_id: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "{}", format!("commit {}", commit_id).yellow())?;
        if let Parents::Merge(first, second) = commit.parents() {
            writeln!(
                writer,
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
