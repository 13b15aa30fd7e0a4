//! Content store
//!
//! Objects live under `.twig/objects/<namespace>/<xx>/<yyyy...>` where the
//! namespace is `blobs` or `commits` and `xxyyyy...` is the object ID. Files are
//! zlib-compressed and written once: storing an object that already exists is
//! a no-op, and nothing is ever updated or deleted.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::TwigError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Length of the fan-out directory name
const FAN_OUT_LENGTH: usize = 2;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    fn namespace_path(&self, object_type: ObjectType) -> PathBuf {
        self.path.join(object_type.namespace())
    }

    fn object_path(&self, object_type: ObjectType, object_id: &ObjectId) -> PathBuf {
        self.namespace_path(object_type).join(object_id.to_path())
    }

    /// Create the namespace directories of an empty store
    pub fn create_layout(&self) -> anyhow::Result<()> {
        for object_type in ObjectType::ALL {
            let namespace_path = self.namespace_path(object_type);
            std::fs::create_dir_all(&namespace_path).context(format!(
                "Unable to create object directory {}",
                namespace_path.display()
            ))?;
        }

        Ok(())
    }

    /// Store an object and return its ID
    ///
    /// Idempotent: an object whose ID is already present is not rewritten.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_content = object.serialize()?;
        let object_id = ObjectId::hash_of(&object_content);
        let object_path = self.object_path(object.object_type(), &object_id);

        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(&object_path, Self::compress(object_content)?)?;
        }

        Ok(object_id)
    }

    /// Decompressed serialized object, header included
    pub fn load(&self, object_type: ObjectType, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.object_path(object_type, object_id);
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    pub fn contains(&self, object_type: ObjectType, object_id: &ObjectId) -> bool {
        self.object_path(object_type, object_id).is_file()
    }

    pub fn parse_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let object_reader = self.parse_object_as_bytes(ObjectType::Blob, object_id)?;

        Blob::deserialize(object_reader)
    }

    /// Load a commit, failing with `NoSuchCommit` when the store lacks it
    pub fn parse_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        if !self.contains(ObjectType::Commit, object_id) {
            return Err(TwigError::NoSuchCommit(object_id.to_string()).into());
        }

        let object_reader = self.parse_object_as_bytes(ObjectType::Commit, object_id)?;

        Commit::deserialize(object_reader)
            .with_context(|| format!("Unable to parse commit {}", object_id))
    }

    pub fn slim_commit(&self, object_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        Ok(self.parse_commit(object_id)?.slim(object_id.clone()))
    }

    fn parse_object_as_bytes(
        &self,
        object_type: ObjectType,
        object_id: &ObjectId,
    ) -> anyhow::Result<impl BufRead> {
        let object_content = self.load(object_type, object_id)?;
        let total_len = object_content.len();
        let mut object_reader = Cursor::new(object_content);

        let (stored_type, size) = ObjectType::read_header(&mut object_reader)?;
        if stored_type != object_type {
            anyhow::bail!(
                "Object {} is a {}, expected a {}",
                object_id,
                stored_type,
                object_type
            );
        }
        if total_len - object_reader.position() as usize != size {
            anyhow::bail!("Object {} is truncated", object_id);
        }

        Ok(object_reader)
    }

    /// Every object ID of a namespace, in fan-out directory order
    pub fn list(&self, object_type: ObjectType) -> anyhow::Result<Vec<ObjectId>> {
        let namespace_path = self.namespace_path(object_type);
        if !namespace_path.exists() {
            return Ok(Vec::new());
        }

        WalkDir::new(&namespace_path)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&namespace_path).ok()?;
                let oid = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy())
                    .collect::<String>();

                // skip leftover temp files
                (oid.len() == OBJECT_ID_LENGTH).then_some(oid)
            })
            .map(ObjectId::try_parse)
            .collect()
    }

    /// Find all objects of a namespace whose ID starts with the given prefix
    ///
    /// Used to resolve abbreviated IDs. More than one match means the prefix is
    /// ambiguous.
    pub fn find_by_prefix(
        &self,
        object_type: ObjectType,
        prefix: &str,
    ) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Vec::new());
        }

        // with 2+ characters only the matching fan-out directory is searched
        if prefix.len() >= FAN_OUT_LENGTH {
            let (dir_name, file_prefix) = prefix.split_at(FAN_OUT_LENGTH);
            let dir_path = self.namespace_path(object_type).join(dir_name);
            if !dir_path.is_dir() {
                return Ok(Vec::new());
            }

            let mut matches = Vec::new();
            for entry in std::fs::read_dir(&dir_path)? {
                let file_name = entry?.file_name();
                let file_name = file_name.to_string_lossy();

                if file_name.starts_with(file_prefix)
                    && let Ok(oid) = ObjectId::try_parse(format!("{}{}", dir_name, file_name))
                {
                    matches.push(oid);
                }
            }
            matches.sort();

            return Ok(matches);
        }

        Ok(self
            .list(object_type)?
            .into_iter()
            .filter(|oid| oid.as_ref().starts_with(&prefix))
            .collect())
    }

    /// Resolve a full or abbreviated commit ID
    pub fn resolve_commit(&self, revision: &str) -> anyhow::Result<ObjectId> {
        let mut matches = self.find_by_prefix(ObjectType::Commit, revision)?;

        match matches.len() {
            0 => Err(TwigError::NoSuchCommit(revision.to_string()).into()),
            1 => Ok(matches.remove(0)),
            _ => Err(TwigError::AmbiguousCommit(revision.to_string()).into()),
        }
    }

    /// Copy one stored object into another store, unless already present there
    ///
    /// The compressed file is copied as is, the object ID does not change.
    pub fn copy_to(
        &self,
        object_type: ObjectType,
        object_id: &ObjectId,
        destination: &Database,
    ) -> anyhow::Result<()> {
        let target_path = destination.object_path(object_type, object_id);
        if target_path.exists() {
            return Ok(());
        }

        let source_path = self.object_path(object_type, object_id);
        let object_content = std::fs::read(&source_path).context(format!(
            "Unable to read object file {}",
            source_path.display()
        ))?;

        std::fs::create_dir_all(
            target_path
                .parent()
                .context(format!("Invalid object path {}", target_path.display()))?,
        )?;
        destination.write_object(&target_path, object_content.into())
    }

    fn write_object(&self, object_path: &Path, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
