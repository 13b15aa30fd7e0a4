use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use derive_new::new;
use std::collections::HashSet;

/// Number of objects a transfer copied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub commits: usize,
    pub blobs: usize,
}

/// Copies history from one content store into another
///
/// A store only ever holds a commit together with all of its ancestors and
/// their blobs, so the walk stops at commits the destination already has.
#[derive(new)]
pub struct Transfer<'d> {
    source: &'d Database,
    destination: &'d Database,
}

/// Step of the depth-first walk over parent links
enum Visit {
    Enter(ObjectId),
    Leave(ObjectId, Commit),
}

impl<'d> Transfer<'d> {
    /// Copy everything reachable from `tip` that the destination lacks
    ///
    /// Ancestors land before descendants and blobs before the commit that
    /// references them, so an interrupted transfer leaves a consistent store.
    pub fn copy_reachable(&self, tip: &ObjectId) -> anyhow::Result<TransferSummary> {
        let mut summary = TransferSummary::default();

        for (commit_id, commit) in self.missing_commits(tip)? {
            for blob_id in commit.files().values() {
                if !self.destination.contains(ObjectType::Blob, blob_id) {
                    self.source
                        .copy_to(ObjectType::Blob, blob_id, self.destination)?;
                    summary.blobs += 1;
                }
            }

            self.source
                .copy_to(ObjectType::Commit, &commit_id, self.destination)?;
            summary.commits += 1;
        }

        Ok(summary)
    }

    /// Commits reachable from `tip` absent from the destination, every
    /// commit after all of its parents
    fn missing_commits(&self, tip: &ObjectId) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut missing = Vec::new();
        let mut entered = HashSet::new();
        let mut stack = vec![Visit::Enter(tip.clone())];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Leave(commit_id, commit) => missing.push((commit_id, commit)),
                Visit::Enter(commit_id) => {
                    if entered.contains(&commit_id)
                        || self.destination.contains(ObjectType::Commit, &commit_id)
                    {
                        continue;
                    }

                    let commit = self.source.parse_commit(&commit_id)?;
                    let parents = commit.parents().iter().cloned().collect::<Vec<_>>();
                    entered.insert(commit_id.clone());
                    stack.push(Visit::Leave(commit_id, commit));
                    stack.extend(
                        parents
                            .into_iter()
                            .filter(|parent_id| !entered.contains(parent_id))
                            .map(Visit::Enter),
                    );
                }
            }
        }

        Ok(missing)
    }
}
