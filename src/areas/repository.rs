use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::areas::remotes::Remotes;
use crate::areas::stage::Stage;
use crate::areas::workspace::{METADATA_DIR, Workspace};
use crate::artifacts::merge::ancestry::AncestryFinder;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Repository context
///
/// Owns every area of one repository: the content store, the branch registry,
/// the stage, the remote registry and the working tree. Commands are methods
/// on this type and write user-facing output to the injected writer.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    stage: Arc<Mutex<Stage>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    remotes: Remotes,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;
        let metadata_path = path.join(METADATA_DIR);

        let stage = Stage::new(metadata_path.join("stage").into_boxed_path());
        let database = Database::new(metadata_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata_path.clone().into_boxed_path());
        let remotes = Remotes::new(
            metadata_path.join("remotes").into_boxed_path(),
            path.clone().into_boxed_path(),
        );

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            stage: Arc::new(Mutex::new(stage)),
            database,
            workspace,
            refs,
            remotes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().is_dir()
    }

    /// Fail with `NotInitialized` unless `.twig` exists
    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(TwigError::NotInitialized.into())
        }
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn stage(&self) -> Arc<Mutex<Stage>> {
        self.stage.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn remotes(&self) -> &Remotes {
        &self.remotes
    }

    /// ID and contents of the commit HEAD points at
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let head_oid = self.refs.read_head()?;
        let head_commit = self.database.parse_commit(&head_oid)?;

        Ok((head_oid, head_commit))
    }

    /// Ancestry queries over this repository's content store
    pub fn ancestry(
        &self,
    ) -> AncestryFinder<impl Fn(&ObjectId) -> anyhow::Result<SlimCommit> + '_> {
        AncestryFinder::new(|oid: &ObjectId| self.database.slim_commit(oid))
    }
}
