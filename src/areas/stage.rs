//! Staging area
//!
//! Pending changes for the next commit: files staged for addition (name to the
//! blob ID to commit) and files staged for removal (name to the blob ID the
//! last commit tracked). A name is never pending in both maps at once.
//!
//! The stage is persisted to `.twig/stage` (see [`crate::artifacts::stage`])
//! with a trailing SHA-1 checksum, and read back under a shared file lock.

use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::stage::checksum::Checksummed;
use crate::artifacts::stage::stage_entry::{ENTRY_FIXED_SIZE, StageEntry};
use crate::artifacts::stage::stage_header::StageHeader;
use crate::artifacts::stage::HEADER_SIZE;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Stage {
    /// Path to the stage file (typically `.twig/stage`)
    path: Box<Path>,
    additions: BTreeMap<String, ObjectId>,
    removals: BTreeMap<String, ObjectId>,
    /// Whether the stage has been modified since loading
    changed: bool,
}

impl Stage {
    pub fn new(path: Box<Path>) -> Self {
        Stage {
            path,
            additions: BTreeMap::new(),
            removals: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stage from disk
    ///
    /// A missing or empty stage file means nothing is staged.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();
        self.changed = false;

        if !self.path().exists() {
            return Ok(());
        }

        let mut stage_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut stage_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksummed::new(lock.deref_mut());
        let header = Self::parse_header(&mut reader)?;

        for _ in 0..header.additions_count {
            let entry = Self::parse_entry(&mut reader)?;
            self.additions.insert(entry.name, entry.oid);
        }
        for _ in 0..header.removals_count {
            let entry = Self::parse_entry(&mut reader)?;
            self.removals.insert(entry.name, entry.oid);
        }

        reader.verify_trailer()
    }

    fn parse_header(reader: &mut Checksummed<impl Read>) -> anyhow::Result<StageHeader> {
        let header_bytes = reader.read_chunk(HEADER_SIZE)?;

        StageHeader::deserialize(Cursor::new(header_bytes))
    }

    fn parse_entry(reader: &mut Checksummed<impl Read>) -> anyhow::Result<StageEntry> {
        let mut entry_bytes = reader.read_chunk(ENTRY_FIXED_SIZE)?;
        let name = reader.read_chunk(StageEntry::name_length(&entry_bytes))?;
        entry_bytes.extend(name);

        StageEntry::deserialize(Cursor::new(entry_bytes))
    }

    /// Persist the stage if it changed since it was loaded
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut stage_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let mut lock = file_guard::lock(&mut stage_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksummed::new(lock.deref_mut());

        let header = StageHeader::with_counts(self.additions.len(), self.removals.len());
        writer.write_all(&header.serialize()?)?;

        for (name, oid) in self.additions.iter().chain(self.removals.iter()) {
            let entry = StageEntry::new(name.clone(), oid.clone());
            writer.write_all(&entry.serialize()?)?;
        }

        writer.finish()?;
        self.changed = false;

        Ok(())
    }

    /// Record a file for addition, cancelling any pending removal of it
    pub fn stage_for_addition(&mut self, name: String, oid: ObjectId) {
        self.removals.remove(&name);
        self.additions.insert(name, oid);
        self.changed = true;
    }

    /// Record a file for removal, cancelling any pending addition of it
    pub fn stage_for_removal(&mut self, name: String, oid: ObjectId) {
        self.additions.remove(&name);
        self.removals.insert(name, oid);
        self.changed = true;
    }

    /// Drop every pending change of a file
    ///
    /// Returns whether anything was pending.
    pub fn unstage(&mut self, name: &str) -> bool {
        let unstaged = self.additions.remove(name).is_some() | self.removals.remove(name).is_some();
        self.changed |= unstaged;

        unstaged
    }

    /// Cancel a pending removal, leaving pending additions alone
    pub fn cancel_removal(&mut self, name: &str) -> bool {
        let cancelled = self.removals.remove(name).is_some();
        self.changed |= cancelled;

        cancelled
    }

    /// Cancel a pending addition, leaving pending removals alone
    pub fn cancel_addition(&mut self, name: &str) -> bool {
        let cancelled = self.additions.remove(name).is_some();
        self.changed |= cancelled;

        cancelled
    }

    pub fn addition(&self, name: &str) -> Option<&ObjectId> {
        self.additions.get(name)
    }

    pub fn is_staged_for_addition(&self, name: &str) -> bool {
        self.additions.contains_key(name)
    }

    pub fn is_staged_for_removal(&self, name: &str) -> bool {
        self.removals.contains_key(name)
    }

    pub fn additions(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.additions.iter()
    }

    pub fn removals(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.removals.iter()
    }

    pub fn clear(&mut self) {
        self.changed |= !self.is_empty();
        self.additions.clear();
        self.removals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }
}
