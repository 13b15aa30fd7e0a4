//! Working directory
//!
//! File names are repository-relative and always use `/` as the separator, so
//! the same name keys commit file tables, the stage and this directory on
//! every platform. The `.twig` metadata directory is never listed.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{FileTable, is_valid_file_name};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Name of the metadata directory
pub const METADATA_DIR: &str = ".twig";

const IGNORED_PATHS: [&str; 3] = [METADATA_DIR, ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalize a user-supplied path into a repository file name
    ///
    /// Accepts `\` or `/` separators and strips `./` segments.
    pub fn normalize_name(name: &str) -> String {
        name.replace('\\', "/")
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>()
            .join("/")
    }

    fn file_path(&self, name: &str) -> PathBuf {
        name.split('/')
            .fold(self.path.to_path_buf(), |path, segment| path.join(segment))
    }

    /// Every file of the working tree, sorted by name
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.file_name().to_string_lossy().as_ref()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.relative_name(entry.path()))
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(file_name: &str) -> bool {
        IGNORED_PATHS.contains(&file_name)
    }

    fn relative_name(&self, path: &Path) -> Option<String> {
        let relative_path = path.strip_prefix(self.path.as_ref()).ok()?;

        relative_path
            .components()
            .map(|component| match component {
                Component::Normal(segment) => segment.to_str().map(String::from),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(|segments| segments.join("/"))
    }

    /// Files named by a user path: the file itself, or every file below a directory
    ///
    /// The empty name stands for the whole working tree. Names reaching
    /// outside the tree or into `.twig` are reported as not found.
    pub fn expand_path(&self, name: &str) -> anyhow::Result<Vec<String>> {
        if !name.is_empty() && !is_valid_file_name(name) {
            return Err(TwigError::FileNotFound(name.to_string()).into());
        }

        let file_path = self.file_path(name);

        if file_path.is_file() {
            return Ok(vec![name.to_string()]);
        }
        if !file_path.is_dir() {
            return Err(TwigError::FileNotFound(name.to_string()).into());
        }

        let dir_prefix = format!("{}/", name);
        Ok(self
            .list_files()?
            .into_iter()
            .filter(|file| name.is_empty() || file.starts_with(&dir_prefix))
            .collect())
    }

    pub fn read_file(&self, name: &str) -> anyhow::Result<Bytes> {
        let file_path = self.file_path(name);

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content.into())
    }

    pub fn parse_blob(&self, name: &str) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(name)?))
    }

    /// Write a file, creating missing parent directories
    pub fn write_file(&self, name: &str, content: &[u8]) -> anyhow::Result<()> {
        let file_path = self.file_path(name);

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        std::fs::write(&file_path, content)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))
    }

    /// Delete a file if present, then any parent directories it leaves empty
    pub fn remove_file(&self, name: &str) -> anyhow::Result<()> {
        let file_path = self.file_path(name);

        if file_path.is_file() {
            std::fs::remove_file(&file_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        let mut parent = file_path.parent();
        while let Some(dir) = parent
            && dir != self.path.as_ref()
            && dir.read_dir().map(|mut entries| entries.next().is_none()).unwrap_or(false)
        {
            std::fs::remove_dir(dir)
                .with_context(|| format!("Failed to remove directory: {:?}", dir))?;
            parent = dir.parent();
        }

        Ok(())
    }

    /// Blob ID of every working file, without storing anything
    pub fn snapshot(&self) -> anyhow::Result<FileTable> {
        self.list_files()?
            .into_iter()
            .map(|name| -> anyhow::Result<(String, ObjectId)> {
                let oid = self.parse_blob(&name)?.object_id()?;
                Ok((name, oid))
            })
            .collect()
    }
}
