use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use rstest::fixture;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use twig::areas::repository::Repository;
use twig::artifacts::objects::commit::Commit;
use twig::artifacts::objects::object_id::ObjectId;

/// Writer whose output stays readable after it is handed to a repository
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Everything written since the last call
    pub fn take(&self) -> String {
        let mut buffer = self.0.lock().unwrap();
        String::from_utf8(std::mem::take(&mut *buffer)).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A repository on a temporary working directory, with captured output
pub struct TestRepository {
    pub dir: TempDir,
    pub repository: Repository,
    pub output: SharedBuffer,
}

impl TestRepository {
    pub fn open(dir: TempDir) -> Self {
        colored::control::set_override(false);

        let output = SharedBuffer::default();
        let repository = Repository::new(
            dir.path().to_str().expect("temp dir path is not UTF-8"),
            Box::new(output.clone()),
        )
        .expect("Failed to open repository");

        TestRepository {
            dir,
            repository,
            output,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.path().join(".twig")
    }

    pub fn write(&self, name: &str, content: &str) {
        write_file(FileSpec::new(self.dir.path().join(name), content.to_string()));
    }

    pub fn read(&self, name: &str) -> String {
        read_file(&self.dir.path().join(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    pub fn delete(&self, name: &str) {
        std::fs::remove_file(self.dir.path().join(name)).unwrap();
    }

    pub fn head(&self) -> ObjectId {
        self.repository.refs().read_head().unwrap()
    }

    pub fn head_commit(&self) -> Commit {
        self.repository.head_commit().unwrap().1
    }

    pub fn take_output(&self) -> String {
        self.output.take()
    }

    /// Write files, stage them and commit; returns the new HEAD
    pub async fn commit_files(&mut self, files: &[(&str, &str)], message: &str) -> ObjectId {
        for (name, content) in files {
            self.write(name, content);
        }
        let names = files
            .iter()
            .map(|(name, _)| name.to_string())
            .collect::<Vec<_>>();

        self.repository.add(&names).await.unwrap();
        self.repository.commit(message).await.unwrap();
        self.take_output();

        self.head()
    }
}

#[fixture]
pub fn test_repository() -> TestRepository {
    TestRepository::open(TempDir::new().expect("Failed to create temp dir"))
}

#[fixture]
pub async fn initialized_repository() -> TestRepository {
    let mut test_repository =
        TestRepository::open(TempDir::new().expect("Failed to create temp dir"));
    test_repository.repository.init().await.unwrap();
    test_repository.take_output();

    test_repository
}
