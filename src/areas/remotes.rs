//! Remote registry
//!
//! A remote is another repository's `.twig` directory on the local file
//! system, registered under a name. The registry is the `.twig/remotes` file,
//! one `<name>\t<path>` line per remote. Relative paths are resolved against
//! the repository root.

use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::errors::TwigError;
use anyhow::Context;
use file_guard::Lock;
use std::collections::BTreeMap;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

#[derive(Debug)]
pub struct Remotes {
    /// Path to the registry file (typically `.twig/remotes`)
    path: Box<Path>,
    /// Directory relative remote paths are resolved against
    root: Box<Path>,
}

/// Object store and branches of a remote repository
#[derive(Debug)]
pub struct RemoteStore {
    name: String,
    database: Database,
    refs: Refs,
}

impl RemoteStore {
    /// Open the repository whose metadata directory is `metadata_path`
    pub fn open(name: &str, metadata_path: &Path) -> anyhow::Result<Self> {
        if !metadata_path.is_dir() {
            return Err(
                TwigError::RemoteDirectoryNotFound(metadata_path.display().to_string()).into(),
            );
        }

        Ok(RemoteStore {
            name: name.to_string(),
            database: Database::new(metadata_path.join("objects").into_boxed_path()),
            refs: Refs::new(metadata_path.to_path_buf().into_boxed_path()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}

impl Remotes {
    pub fn new(path: Box<Path>, root: Box<Path>) -> Self {
        Remotes { path, root }
    }

    /// Registered remotes by name
    pub fn load(&self) -> anyhow::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read remotes file at {:?}", self.path))?;

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.split_once('\t')
                    .map(|(name, path)| (name.to_string(), path.to_string()))
                    .with_context(|| format!("malformed remote entry: {:?}", line))
            })
            .collect()
    }

    /// Register a remote, normalizing `/` to the platform separator
    pub fn add(&self, name: &str, path: &str) -> anyhow::Result<()> {
        let mut remotes = self.load()?;
        if remotes.contains_key(name) {
            return Err(TwigError::RemoteExists(name.to_string()).into());
        }

        remotes.insert(name.to_string(), path.replace('/', MAIN_SEPARATOR_STR));
        self.write(&remotes)
    }

    pub fn remove(&self, name: &str) -> anyhow::Result<()> {
        let mut remotes = self.load()?;
        if remotes.remove(name).is_none() {
            return Err(TwigError::RemoteNotFound(name.to_string()).into());
        }

        self.write(&remotes)
    }

    /// Metadata directory of a registered remote
    pub fn resolve(&self, name: &str) -> anyhow::Result<PathBuf> {
        let path = self
            .load()?
            .remove(name)
            .ok_or_else(|| TwigError::RemoteNotFound(name.to_string()))?;
        let path = PathBuf::from(path);

        if path.is_relative() {
            Ok(self.root.join(path))
        } else {
            Ok(path)
        }
    }

    pub fn open(&self, name: &str) -> anyhow::Result<RemoteStore> {
        RemoteStore::open(name, &self.resolve(name)?)
    }

    fn write(&self, remotes: &BTreeMap<String, String>) -> anyhow::Result<()> {
        let content = remotes
            .iter()
            .map(|(name, path)| format!("{}\t{}\n", name, path))
            .collect::<String>();

        let mut remotes_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("failed to open remotes file at {:?}", self.path))?;
        let mut lock = file_guard::lock(&mut remotes_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(content.as_bytes())?;

        Ok(())
    }
}
