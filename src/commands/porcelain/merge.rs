use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::ensure_no_untracked_shadowed;
use crate::artifacts::merge::conflict::conflict_marker;
use crate::artifacts::merge::resolution::{MergePlan, Resolution};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{FileTable, Parents};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use std::io::Write;

/// How a successful merge ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The active branch was an ancestor of the given one and now points at it
    FastForward,
    /// A two-parent commit was created, possibly with conflict markers
    Merged {
        commit: ObjectId,
        conflicts: Vec<String>,
    },
}

/// File system change a merge makes to one file
enum MergeStep {
    Write { name: String, blob: Blob, oid: ObjectId },
    Delete { name: String, oid: ObjectId },
}

impl Repository {
    /// Merge a branch into the active branch
    ///
    /// Every precondition, including the untracked file guard, is checked
    /// before the working tree, the stage or any ref changes.
    pub async fn merge(&mut self, branch: &str) -> anyhow::Result<MergeOutcome> {
        self.ensure_initialized()?;

        let (given_branch, given_oid) = self.existing_branch(branch)?;
        let current_branch = self.refs().active_branch()?;
        if given_branch == current_branch {
            return Err(TwigError::MergeWithSelf.into());
        }

        let stage = self.stage();
        let mut stage = stage.lock().await;

        stage.rehydrate()?;

        if !stage.is_empty() {
            return Err(TwigError::UncommittedChanges.into());
        }

        let (current_oid, current_commit) = self.head_commit()?;
        let split_oid = self
            .ancestry()
            .lowest_common_ancestor(&current_oid, &given_oid)?
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "no common ancestor between {} and {}",
                    current_branch,
                    given_branch
                )
            })?;

        if split_oid == given_oid {
            return Err(TwigError::MergeNotNeeded.into());
        }

        if split_oid == current_oid {
            self.switch_snapshot(&given_oid, &mut stage)?;
            self.refs().advance_active(&given_oid)?;
            stage.write_updates()?;

            writeln!(self.writer(), "Current branch fast-forwarded.")?;

            return Ok(MergeOutcome::FastForward);
        }

        let split_commit = self.database().parse_commit(&split_oid)?;
        let given_commit = self.database().parse_commit(&given_oid)?;

        let workspace = self.workspace().snapshot()?;
        ensure_no_untracked_shadowed(&workspace, current_commit.files(), given_commit.files())?;

        let plan = MergePlan::new(
            split_commit.files(),
            current_commit.files(),
            given_commit.files(),
        );
        let steps = self.plan_merge_steps(&plan, current_commit.files(), given_commit.files())?;

        for step in steps {
            match step {
                MergeStep::Write { name, blob, oid } => {
                    self.database().store(&blob)?;
                    self.workspace().write_file(&name, blob.content())?;
                    stage.stage_for_addition(name, oid);
                }
                MergeStep::Delete { name, oid } => {
                    self.workspace().remove_file(&name)?;
                    stage.stage_for_removal(name, oid);
                }
            }
        }

        let message = format!("Merged {} into {}.", given_branch, current_branch);
        let commit_id = self.write_commit(
            message,
            Parents::Merge(current_oid, given_oid),
            current_commit.files(),
            &mut stage,
        )?;

        stage.write_updates()?;

        if plan.has_conflicts() {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
        }

        Ok(MergeOutcome::Merged {
            commit: commit_id,
            conflicts: plan.conflicts().cloned().collect(),
        })
    }

    fn plan_merge_steps(
        &self,
        plan: &MergePlan,
        current: &FileTable,
        given: &FileTable,
    ) -> anyhow::Result<Vec<MergeStep>> {
        plan.actions()
            .filter_map(|(name, resolution)| match resolution {
                Resolution::Keep => None,
                Resolution::TakeGiven(oid) => Some(
                    self.database()
                        .parse_blob(oid)
                        .map(|blob| MergeStep::Write {
                            name: name.clone(),
                            blob,
                            oid: oid.clone(),
                        }),
                ),
                Resolution::Remove => current.get(name).map(|oid| {
                    Ok(MergeStep::Delete {
                        name: name.clone(),
                        oid: oid.clone(),
                    })
                }),
                Resolution::Conflict => Some(self.conflict_step(name, current, given)),
            })
            .collect()
    }

    fn conflict_step(
        &self,
        name: &str,
        current: &FileTable,
        given: &FileTable,
    ) -> anyhow::Result<MergeStep> {
        let load_content = |oid: Option<&ObjectId>| -> anyhow::Result<Option<Blob>> {
            oid.map(|oid| self.database().parse_blob(oid)).transpose()
        };

        let current_blob = load_content(current.get(name))?;
        let given_blob = load_content(given.get(name))?;

        let blob = Blob::new(conflict_marker(
            current_blob.as_ref().map(|blob| blob.content().as_ref()),
            given_blob.as_ref().map(|blob| blob.content().as_ref()),
        ));
        let oid = blob.object_id()?;

        Ok(MergeStep::Write {
            name: name.to_string(),
            blob,
            oid,
        })
    }
}
