//! Ancestry queries over the commit graph
//!
//! Two queries are answered here:
//!
//! - **Ancestor test**: is one commit reachable from another through parent
//!   edges? A commit is its own ancestor.
//! - **Lowest common ancestor** (the split point of a merge): a breadth-first
//!   traversal from each side records the shortest parent-hop distance to every
//!   ancestor. The common ancestor with the smallest distance sum wins; ties go
//!   to the one discovered first from the first side.
//!
//! Both traversals visit a merge commit's first parent before its second, so
//! discovery order, and with it the tie-break, is stable.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let finder = AncestryFinder::new(|commit_id| database.slim_commit(commit_id));
//!
//! let split_point = finder.lowest_common_ancestor(&head, &other)?;
//! ```
//!
//! ## Debug Logging
//!
//! Build with `--features debug_merge` to trace distances and candidates on
//! stderr.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Macro for debug logging that is enabled with the debug_merge feature flag
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH =
            Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (
            self.contains(VisitState::VISITED_FROM_SOURCE),
            self.contains(VisitState::VISITED_FROM_TARGET),
        ) {
            (true, true) => write!(f, "SOURCE|TARGET"),
            (true, false) => write!(f, "SOURCE"),
            (false, true) => write!(f, "TARGET"),
            (false, false) => write!(f, "NONE"),
        }
    }
}

/// Shortest parent-hop distance of every ancestor, in discovery order
struct Distances {
    hops: HashMap<ObjectId, usize>,
    order: Vec<ObjectId>,
}

/// Ancestry queries backed by a commit loader
///
/// The loader maps a commit ID to its parents. It is typically the content
/// store, but any graph source works (tests use an in-memory map).
pub struct AncestryFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> AncestryFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Whether `candidate` is reachable from `commit` (zero steps included)
    pub fn is_ancestor(&self, candidate: &ObjectId, commit: &ObjectId) -> anyhow::Result<bool> {
        let mut visited = HashSet::from([commit.clone()]);
        let mut queue = VecDeque::from([commit.clone()]);

        while let Some(commit_id) = queue.pop_front() {
            if &commit_id == candidate {
                return Ok(true);
            }

            for parent_id in (self.commit_loader)(&commit_id)?.parents {
                if visited.insert(parent_id.clone()) {
                    queue.push_back(parent_id);
                }
            }
        }

        Ok(false)
    }

    fn distances(&self, start: &ObjectId) -> anyhow::Result<Distances> {
        let mut hops = HashMap::from([(start.clone(), 0)]);
        let mut order = vec![start.clone()];
        let mut queue = VecDeque::from([start.clone()]);

        while let Some(commit_id) = queue.pop_front() {
            let distance = hops[&commit_id];

            for parent_id in (self.commit_loader)(&commit_id)?.parents {
                if !hops.contains_key(&parent_id) {
                    hops.insert(parent_id.clone(), distance + 1);
                    order.push(parent_id.clone());
                    queue.push_back(parent_id);
                }
            }
        }

        Ok(Distances { hops, order })
    }

    /// Split point of `source` and `target`
    ///
    /// `None` only when the two histories share no commit.
    pub fn lowest_common_ancestor(
        &self,
        source: &ObjectId,
        target: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let from_source = self.distances(source)?;
        let from_target = self.distances(target)?;

        let mut states = HashMap::<&ObjectId, VisitState>::new();
        for commit_id in from_source.hops.keys() {
            *states.entry(commit_id).or_insert(VisitState::NONE) |= VisitState::VISITED_FROM_SOURCE;
        }
        for commit_id in from_target.hops.keys() {
            *states.entry(commit_id).or_insert(VisitState::NONE) |= VisitState::VISITED_FROM_TARGET;
        }

        debug_log!(
            "Ancestor states: {}",
            states
                .iter()
                .map(|(oid, state)| format!("{}: {:?}", oid.to_short_oid(), state))
                .collect::<Vec<_>>()
                .join(", ")
        );

        // min_by_key keeps the first of equal minima, i.e. the earliest discovered
        let split_point = from_source
            .order
            .iter()
            .filter(|commit_id| states[commit_id] == VisitState::VISITED_FROM_BOTH)
            .min_by_key(|commit_id| from_source.hops[*commit_id] + from_target.hops[*commit_id])
            .cloned();

        debug_log!(
            "Split point of {} and {}: {:?}",
            source.to_short_oid(),
            target.to_short_oid(),
            split_point.as_ref().map(|oid| oid.to_short_oid())
        );

        Ok(split_point)
    }
}
