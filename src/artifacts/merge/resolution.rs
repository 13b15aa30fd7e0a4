//! Per-file merge resolution
//!
//! Every file name present in the current or given snapshot is resolved by
//! comparing its blob ID at the split point, in the current commit and in the
//! given commit. Names only present at the split point were deleted on both
//! sides and need nothing.
//!
//! | split | current | given | Resolution |
//! |-------|---------|-------|------------|
//! | any   | = given | = current | keep |
//! | yes   | no      | = split | keep (stays deleted) |
//! | yes   | no      | changed | conflict |
//! | yes   | = split | no      | remove |
//! | yes   | changed | no      | conflict |
//! | yes   | any     | = split | keep current |
//! | yes   | = split | changed | take given |
//! | yes   | changed | changed | conflict |
//! | no    | no      | yes     | take given |
//! | no    | yes     | no      | keep |
//! | no    | yes     | yes     | conflict |

use crate::artifacts::objects::commit::FileTable;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};

/// What a merge does to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Leave the current version (or absence) alone
    Keep,
    /// Check out the given version and stage it for addition
    TakeGiven(ObjectId),
    /// Delete the file and stage it for removal
    Remove,
    /// Write a conflict marker file and stage it for addition
    Conflict,
}

/// Resolve one file from its three versions
pub fn resolve(
    split: Option<&ObjectId>,
    current: Option<&ObjectId>,
    given: Option<&ObjectId>,
) -> Resolution {
    match (split, current, given) {
        (_, current, given) if current == given => Resolution::Keep,
        (Some(split), None, Some(given)) if given != split => Resolution::Conflict,
        (Some(_), None, Some(_)) => Resolution::Keep,
        (Some(split), Some(current), None) if current != split => Resolution::Conflict,
        (Some(_), Some(_), None) => Resolution::Remove,
        (Some(split), Some(_), Some(given)) if given == split => Resolution::Keep,
        (Some(split), Some(current), Some(given)) if current == split => {
            Resolution::TakeGiven(given.clone())
        }
        (Some(_), Some(_), Some(_)) => Resolution::Conflict,
        (None, None, Some(given)) => Resolution::TakeGiven(given.clone()),
        (None, Some(_), None) => Resolution::Keep,
        (None, Some(_), Some(_)) => Resolution::Conflict,
        (_, None, None) => Resolution::Keep,
    }
}

/// Resolutions of every file a merge touches, by name
///
/// Files resolved to [`Resolution::Keep`] are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    actions: BTreeMap<String, Resolution>,
}

impl MergePlan {
    pub fn new(split: &FileTable, current: &FileTable, given: &FileTable) -> Self {
        let names = current.keys().chain(given.keys()).collect::<BTreeSet<_>>();

        let actions = names
            .into_iter()
            .filter_map(|name| {
                match resolve(split.get(name), current.get(name), given.get(name)) {
                    Resolution::Keep => None,
                    resolution => Some((name.clone(), resolution)),
                }
            })
            .collect();

        MergePlan { actions }
    }

    pub fn actions(&self) -> impl Iterator<Item = (&String, &Resolution)> {
        self.actions.iter()
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &String> {
        self.actions
            .iter()
            .filter(|(_, resolution)| **resolution == Resolution::Conflict)
            .map(|(name, _)| name)
    }

    pub fn has_conflicts(&self) -> bool {
        self.conflicts().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn oid(seed: &str) -> ObjectId {
        ObjectId::hash_of(seed.as_bytes())
    }

    enum Expected {
        Keep,
        TakeGiven,
        Remove,
        Conflict,
    }

    #[rstest]
    // split present, current absent
    #[case(Some("s"), None, Some("s"), Expected::Keep)]
    #[case(Some("s"), None, Some("g"), Expected::Conflict)]
    // split present, given absent
    #[case(Some("s"), Some("s"), None, Expected::Remove)]
    #[case(Some("s"), Some("c"), None, Expected::Conflict)]
    // split present, both present
    #[case(Some("s"), Some("x"), Some("x"), Expected::Keep)]
    #[case(Some("s"), Some("s"), Some("s"), Expected::Keep)]
    #[case(Some("s"), Some("c"), Some("s"), Expected::Keep)]
    #[case(Some("s"), Some("s"), Some("g"), Expected::TakeGiven)]
    #[case(Some("s"), Some("c"), Some("g"), Expected::Conflict)]
    // split absent
    #[case(None, None, Some("g"), Expected::TakeGiven)]
    #[case(None, Some("c"), None, Expected::Keep)]
    #[case(None, Some("x"), Some("x"), Expected::Keep)]
    #[case(None, Some("c"), Some("g"), Expected::Conflict)]
    // deleted on both sides
    #[case(Some("s"), None, None, Expected::Keep)]
    fn case_table(
        #[case] split: Option<&str>,
        #[case] current: Option<&str>,
        #[case] given: Option<&str>,
        #[case] expected: Expected,
    ) {
        let (split, current, given) = (split.map(oid), current.map(oid), given.map(oid));

        let resolution = resolve(split.as_ref(), current.as_ref(), given.as_ref());

        let expected = match expected {
            Expected::Keep => Resolution::Keep,
            Expected::TakeGiven => Resolution::TakeGiven(given.unwrap()),
            Expected::Remove => Resolution::Remove,
            Expected::Conflict => Resolution::Conflict,
        };
        assert_eq!(resolution, expected);
    }

    fn table(entries: &[(&str, &str)]) -> FileTable {
        entries
            .iter()
            .map(|(name, seed)| (name.to_string(), oid(seed)))
            .collect()
    }

    #[test]
    fn plan_covers_the_union_and_skips_kept_files() {
        let split = table(&[("same.txt", "1"), ("edited.txt", "1"), ("gone.txt", "1")]);
        let current = table(&[
            ("same.txt", "1"),
            ("edited.txt", "1"),
            ("gone.txt", "1"),
            ("mine.txt", "m"),
        ]);
        let given = table(&[("same.txt", "1"), ("edited.txt", "2"), ("theirs.txt", "t")]);

        let plan = MergePlan::new(&split, &current, &given);

        assert_eq!(
            plan.actions().collect::<Vec<_>>(),
            vec![
                (&"edited.txt".to_string(), &Resolution::TakeGiven(oid("2"))),
                (&"gone.txt".to_string(), &Resolution::Remove),
                (&"theirs.txt".to_string(), &Resolution::TakeGiven(oid("t"))),
            ]
        );
        assert!(!plan.has_conflicts());
    }

    #[test]
    fn plan_reports_conflicted_names() {
        let split = table(&[("f.txt", "1")]);
        let current = table(&[("f.txt", "2")]);
        let given = table(&[("f.txt", "3")]);

        let plan = MergePlan::new(&split, &current, &given);

        assert_eq!(plan.conflicts().collect::<Vec<_>>(), vec!["f.txt"]);
    }
}
