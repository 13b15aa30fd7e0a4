use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

/// Fixed commit date used by CLI tests, `%Y-%m-%d %H:%M:%S %z`
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

/// `COMMIT_DATE` as printed by `log`
pub const READABLE_COMMIT_DATE: &str = "Sun Jan 1 12:00:00 2023 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two\n".to_string(),
    ));

    run_twig_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    twig_commit(repository_dir.path(), "first")
        .assert()
        .success();

    repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.env("NO_COLOR", "1");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_twig_command(dir, &["commit", "-m", message]);
    cmd.env("TWIG_COMMIT_DATE", COMMIT_DATE);
    cmd
}

/// Commit the active branch points at
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_content = std::fs::read_to_string(dir.join(".twig").join("HEAD"))?;
    let ref_path = head_content
        .trim()
        .strip_prefix("ref: ")
        .ok_or("HEAD is not a branch reference")?;

    let commit_sha = std::fs::read_to_string(dir.join(".twig").join(ref_path))?;
    Ok(commit_sha.trim().to_string())
}
