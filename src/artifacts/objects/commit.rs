//! Commit object
//!
//! Commits are complete snapshots of the tracked tree. They contain:
//! - Parent commit ID(s): none for the root, two for a merge, one otherwise
//! - The creation timestamp
//! - A file table mapping every tracked file name to its blob ID
//! - The commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! parent <second-parent-sha>
//! timestamp <unix-seconds> <utc-offset>
//! file <blob-sha> <file name>
//! ...
//!
//! <commit message>
//! ```
//!
//! The file table is sorted by name, so equal snapshots always serialize, and
//! therefore hash, identically.

use crate::areas::stage::Stage;
use crate::areas::workspace::METADATA_DIR;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::TwigError;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Timelike};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// File name to blob ID, sorted by name
pub type FileTable = BTreeMap<String, ObjectId>;

/// Message of the commit every repository starts from
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// Environment variable overriding the commit timestamp
pub const COMMIT_DATE_ENV: &str = "TWIG_COMMIT_DATE";

const READABLE_TIMESTAMP_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Whether a name can key a file table: `/`-separated, non-empty segments,
/// no `.` or `..`, and nothing inside the metadata directory
pub fn is_valid_file_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('/').enumerate().all(|(index, segment)| {
            !matches!(segment, "" | "." | "..") && (index > 0 || segment != METADATA_DIR)
        })
}

/// Parent links of a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parents {
    Root,
    Single(ObjectId),
    Merge(ObjectId, ObjectId),
}

impl Parents {
    pub fn first(&self) -> Option<&ObjectId> {
        match self {
            Parents::Root => None,
            Parents::Single(parent) | Parents::Merge(parent, _) => Some(parent),
        }
    }

    pub fn second(&self) -> Option<&ObjectId> {
        match self {
            Parents::Merge(_, parent) => Some(parent),
            _ => None,
        }
    }

    /// First parent, then second parent
    pub fn iter(&self) -> impl Iterator<Item = &ObjectId> {
        self.first().into_iter().chain(self.second())
    }

    fn try_from_vec(mut parents: Vec<ObjectId>) -> anyhow::Result<Self> {
        match parents.len() {
            0 => Ok(Parents::Root),
            1 => Ok(Parents::Single(parents.remove(0))),
            2 => {
                let second = parents.remove(1);
                Ok(Parents::Merge(parents.remove(0), second))
            }
            count => anyhow::bail!("Invalid commit object: {} parents", count),
        }
    }
}

/// Slim representation of a commit
///
/// Contains only what the ancestry engine needs to walk the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
}

/// Commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parents: Parents,
    timestamp: DateTime<FixedOffset>,
    files: FileTable,
    message: String,
}

impl Commit {
    /// Create a new commit
    ///
    /// Timestamps are kept at second precision, the precision they are stored with.
    pub fn new(
        message: String,
        timestamp: DateTime<FixedOffset>,
        parents: Parents,
        files: FileTable,
    ) -> anyhow::Result<Self> {
        if message.trim().is_empty() {
            return Err(TwigError::EmptyMessage.into());
        }

        Ok(Commit {
            parents,
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            files,
            message,
        })
    }

    /// The root commit: no parents, no files, dated at the Unix epoch
    pub fn initial() -> Self {
        Commit {
            parents: Parents::Root,
            timestamp: DateTime::UNIX_EPOCH.fixed_offset(),
            files: FileTable::new(),
            message: INITIAL_COMMIT_MESSAGE.to_string(),
        }
    }

    /// Build a commit whose snapshot is `base` with the staged edits applied
    ///
    /// Pending additions overlay `base`, then pending removals are deleted.
    /// A root commit starts from an empty table and ignores `base`. The stage
    /// is cleared once the snapshot has been computed.
    pub fn process_stage(
        message: String,
        timestamp: DateTime<FixedOffset>,
        parents: Parents,
        base: &FileTable,
        stage: &mut Stage,
    ) -> anyhow::Result<Self> {
        let mut files = match parents {
            Parents::Root => FileTable::new(),
            _ => base.clone(),
        };

        files.extend(
            stage
                .additions()
                .map(|(name, oid)| (name.clone(), oid.clone())),
        );
        for name in stage.removals().map(|(name, _)| name) {
            files.remove(name);
        }

        let commit = Self::new(message, timestamp, parents, files)?;
        stage.clear();

        Ok(commit)
    }

    /// Timestamp for a new commit: `TWIG_COMMIT_DATE` if set, else now
    pub fn timestamp_from_env() -> DateTime<FixedOffset> {
        std::env::var(COMMIT_DATE_ENV)
            .ok()
            .and_then(|date_str| {
                DateTime::parse_from_rfc2822(&date_str)
                    .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                    .ok()
            })
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn parents(&self) -> &Parents {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Format timestamp like "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format(READABLE_TIMESTAMP_FORMAT).to_string()
    }

    pub fn files(&self) -> &FileTable {
        &self.files
    }

    pub fn blob_id(&self, name: &str) -> Option<&ObjectId> {
        self.files.get(name)
    }

    pub fn tracks(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Whether the snapshot holds exactly this version of this file
    pub fn contains(&self, name: &str, blob_id: &ObjectId) -> bool {
        self.files.get(name) == Some(blob_id)
    }

    pub fn slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents.iter().cloned().collect(),
        }
    }

    fn serialize_timestamp(&self) -> String {
        format!(
            "{} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
        let (seconds, offset) = value
            .split_once(' ')
            .context("Invalid commit object: malformed timestamp")?;
        let seconds = seconds
            .parse::<i64>()
            .context("Invalid commit object: timestamp is not a number")?;

        let sign = match offset.get(..1) {
            Some("+") => 1,
            Some("-") => -1,
            _ => anyhow::bail!("Invalid commit object: malformed offset {}", offset),
        };
        let hours = offset
            .get(1..3)
            .and_then(|hours| hours.parse::<i32>().ok())
            .context("Invalid commit object: malformed offset hours")?;
        let minutes = offset
            .get(3..5)
            .and_then(|minutes| minutes.parse::<i32>().ok())
            .context("Invalid commit object: malformed offset minutes")?;
        let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .context("Invalid commit object: offset out of range")?;

        let datetime = DateTime::from_timestamp(seconds, 0)
            .context("Invalid commit object: timestamp out of range")?;

        Ok(datetime.with_timezone(&offset))
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        for parent in self.parents.iter() {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        object_content.push(format!("timestamp {}", self.serialize_timestamp()));
        for (name, oid) in &self.files {
            object_content.push(format!("file {} {}", oid.as_ref(), name));
        }
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let object_content = object_content.join("\n");

        let mut commit_bytes = Vec::new();
        let header = self.object_type().header(object_content.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(object_content.as_bytes())?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let (header, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut files = FileTable::new();

        for line in header.lines() {
            if let Some(parent_oid) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent_oid.to_string())?);
            } else if let Some(value) = line.strip_prefix("timestamp ") {
                timestamp = Some(Self::parse_timestamp(value)?);
            } else if let Some(entry) = line.strip_prefix("file ") {
                let (oid, name) = entry
                    .split_once(' ')
                    .context("Invalid commit object: invalid file line")?;
                if !is_valid_file_name(name) {
                    anyhow::bail!("Invalid commit object: unsafe file name {:?}", name);
                }
                files.insert(name.to_string(), ObjectId::try_parse(oid.to_string())?);
            } else {
                anyhow::bail!("Invalid commit object: unexpected line {:?}", line);
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing timestamp line")?;

        Self::new(
            message.to_string(),
            timestamp,
            Parents::try_from_vec(parents)?,
            files,
        )
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
