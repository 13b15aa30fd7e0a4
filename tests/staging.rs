mod common;

use crate::common::file::write_generated_files;
use crate::common::kind;
use crate::common::repository::{TestRepository, initialized_repository};
use pretty_assertions::assert_eq;
use rstest::rstest;
use twig::areas::stage::Stage;
use twig::artifacts::objects::blob::Blob;
use twig::artifacts::objects::object::Object;
use twig::artifacts::objects::object_id::ObjectId;
use twig::errors::TwigError;

fn names(files: &[&str]) -> Vec<String> {
    files.iter().map(|file| file.to_string()).collect()
}

fn blob_id(content: &str) -> ObjectId {
    Blob::new(content.to_string().into()).object_id().unwrap()
}

/// Stage as persisted on disk
fn persisted_stage(test_repository: &TestRepository) -> Stage {
    let mut stage = Stage::new(test_repository.metadata_path().join("stage").into_boxed_path());
    stage.rehydrate().unwrap();
    stage
}

#[rstest]
#[tokio::test]
async fn adding_a_missing_file_fails(#[future] initialized_repository: TestRepository) {
    let mut test_repository = initialized_repository.await;
    test_repository.write("present.txt", "here");

    let error = test_repository
        .repository
        .add(&names(&["present.txt", "missing.txt"]))
        .await
        .unwrap_err();

    assert_eq!(kind(error), TwigError::FileNotFound("missing.txt".to_string()));
    assert!(persisted_stage(&test_repository).is_empty());
}

#[rstest]
#[tokio::test]
async fn adding_refuses_paths_that_leave_the_working_tree(
    #[future] initialized_repository: TestRepository,
) {
    let mut test_repository = initialized_repository.await;
    let head = test_repository.head();
    test_repository.write("sub/inner.txt", "inner");

    for path in ["sub/../1.txt", "../1.txt", ".twig/HEAD"] {
        let error = test_repository
            .repository
            .add(&names(&[path]))
            .await
            .unwrap_err();

        assert_eq!(kind(error), TwigError::FileNotFound(path.to_string()));
    }
    assert!(persisted_stage(&test_repository).is_empty());
    assert_eq!(test_repository.head(), head);
}

#[rstest]
#[tokio::test]
async fn adding_stores_the_blob_and_stages_it(#[future] initialized_repository: TestRepository) {
    let mut test_repository = initialized_repository.await;
    test_repository.write("dir/a.txt", "hello\n");

    test_repository
        .repository
        .add(&names(&["./dir/a.txt"]))
        .await
        .unwrap();

    let stage = persisted_stage(&test_repository);
    assert_eq!(stage.addition("dir/a.txt"), Some(&blob_id("hello\n")));
    assert_eq!(
        test_repository
            .repository
            .database()
            .parse_blob(&blob_id("hello\n"))
            .unwrap()
            .content()
            .as_ref(),
        b"hello\n"
    );
}

#[rstest]
#[tokio::test]
async fn adding_a_directory_stages_every_file_below_it(
    #[future] initialized_repository: TestRepository,
) {
    let mut test_repository = initialized_repository.await;
    let generated = write_generated_files(&test_repository.path().join("docs"), 4);
    test_repository.write("outside.txt", "outside");

    test_repository
        .repository
        .add(&names(&["docs"]))
        .await
        .unwrap();

    let stage = persisted_stage(&test_repository);
    assert_eq!(stage.additions().count(), generated.len());
    assert!(!stage.is_staged_for_addition("outside.txt"));
}

#[rstest]
#[tokio::test]
async fn adding_an_unchanged_tracked_file_clears_its_pending_changes(
    #[future] initialized_repository: TestRepository,
) {
    let mut test_repository = initialized_repository.await;
    test_repository
        .commit_files(&[("a.txt", "committed")], "add a")
        .await;

    test_repository.write("a.txt", "edited");
    test_repository.repository.add(&names(&["a.txt"])).await.unwrap();
    assert!(persisted_stage(&test_repository).is_staged_for_addition("a.txt"));

    test_repository.write("a.txt", "committed");
    test_repository.repository.add(&names(&["a.txt"])).await.unwrap();

    assert!(persisted_stage(&test_repository).is_empty());
}

#[rstest]
#[tokio::test]
async fn adding_a_file_pending_removal_cancels_the_removal(
    #[future] initialized_repository: TestRepository,
) {
    let mut test_repository = initialized_repository.await;
    test_repository
        .commit_files(&[("a.txt", "committed")], "add a")
        .await;

    test_repository.repository.remove("a.txt").await.unwrap();
    assert!(!test_repository.exists("a.txt"));
    assert!(persisted_stage(&test_repository).is_staged_for_removal("a.txt"));

    test_repository.write("a.txt", "committed");
    test_repository.repository.add(&names(&["a.txt"])).await.unwrap();

    assert!(persisted_stage(&test_repository).is_empty());
}

#[rstest]
#[tokio::test]
async fn removing_a_staged_file_only_unstages_it(#[future] initialized_repository: TestRepository) {
    let mut test_repository = initialized_repository.await;
    test_repository.write("new.txt", "new");
    test_repository.repository.add(&names(&["new.txt"])).await.unwrap();

    test_repository.repository.remove("new.txt").await.unwrap();

    assert!(persisted_stage(&test_repository).is_empty());
    assert_eq!(test_repository.read("new.txt"), "new");
}

#[rstest]
#[tokio::test]
async fn removing_a_tracked_file_stages_the_removal_and_deletes_it(
    #[future] initialized_repository: TestRepository,
) {
    let mut test_repository = initialized_repository.await;
    test_repository
        .commit_files(&[("dir/a.txt", "a"), ("b.txt", "b")], "add files")
        .await;

    test_repository.repository.remove("dir/a.txt").await.unwrap();

    let stage = persisted_stage(&test_repository);
    assert!(stage.is_staged_for_removal("dir/a.txt"));
    assert!(!test_repository.exists("dir"));
    assert!(test_repository.exists("b.txt"));
}

#[rstest]
#[tokio::test]
async fn removing_an_already_deleted_tracked_file_still_stages_it(
    #[future] initialized_repository: TestRepository,
) {
    let mut test_repository = initialized_repository.await;
    test_repository.commit_files(&[("a.txt", "a")], "add a").await;
    test_repository.delete("a.txt");

    test_repository.repository.remove("a.txt").await.unwrap();

    assert!(persisted_stage(&test_repository).is_staged_for_removal("a.txt"));
}

#[rstest]
#[tokio::test]
async fn removing_an_untracked_file_fails(#[future] initialized_repository: TestRepository) {
    let mut test_repository = initialized_repository.await;
    test_repository.write("untracked.txt", "u");

    let error = test_repository
        .repository
        .remove("untracked.txt")
        .await
        .unwrap_err();

    assert_eq!(
        kind(error),
        TwigError::NothingToRemove("untracked.txt".to_string())
    );
    assert!(test_repository.exists("untracked.txt"));
}
