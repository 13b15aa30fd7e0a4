use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;

impl Repository {
    /// Create a branch pointing at the HEAD commit, without switching to it
    pub fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let source_oid = self.refs().read_head()?;

        self.refs().create_branch(&branch_name, &source_oid)?;

        Ok(())
    }

    /// Delete a branch pointer; its commits stay in the store
    pub fn delete_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| TwigError::NoSuchBranch(branch_name.to_string()))?;
        let oid = self.refs().delete_branch(&branch_name)?;

        eprintln!("Deleted branch {} (was {})", branch_name, oid.to_short_oid());

        Ok(())
    }

    /// Name and commit of a branch that must exist
    pub(crate) fn existing_branch(&self, name: &str) -> anyhow::Result<(BranchName, ObjectId)> {
        let no_such_branch = || TwigError::NoSuchBranch(name.to_string());

        let branch_name = BranchName::try_parse(name.to_string()).map_err(|_| no_such_branch())?;
        let oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or_else(no_such_branch)?;

        Ok((branch_name, oid))
    }
}
