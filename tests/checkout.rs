mod common;

use crate::common::kind;
use crate::common::repository::{TestRepository, initialized_repository};
use pretty_assertions::assert_eq;
use rstest::rstest;
use twig::artifacts::branch::branch_name::BranchName;
use twig::errors::TwigError;

#[rstest]
#[tokio::test]
async fn an_old_version_of_a_file_can_be_checked_out_by_abbreviated_id(
    #[future] initialized_repository: TestRepository,
) {
    let mut test_repository = initialized_repository.await;
    let first = test_repository
        .commit_files(&[("wug.txt", "This is a wug.\n")], "version 1")
        .await;
    test_repository
        .commit_files(&[("wug.txt", "This is not a wug.\n")], "version 2")
        .await;

    test_repository
        .repository
        .checkout_file_from(&first.to_short_oid(), "wug.txt")
        .await
        .unwrap();
    assert_eq!(test_repository.read("wug.txt"), "This is a wug.\n");

    test_repository
        .repository
        .checkout_file("wug.txt")
        .await
        .unwrap();
    assert_eq!(test_repository.read("wug.txt"), "This is not a wug.\n");
}

#[rstest]
#[tokio::test]
async fn file_checkout_leaves_the_stage_alone(#[future] initialized_repository: TestRepository) {
    let mut test_repository = initialized_repository.await;
    test_repository.commit_files(&[("a.txt", "committed")], "add a").await;
    test_repository.write("a.txt", "staged");
    test_repository
        .repository
        .add(&["a.txt".to_string()])
        .await
        .unwrap();

    test_repository.repository.checkout_file("a.txt").await.unwrap();

    assert_eq!(test_repository.read("a.txt"), "committed");
    test_repository.repository.status().await.unwrap();
    let status = test_repository.take_output();
    assert!(status.contains("=== Staged Files ===\na.txt\n"));
    assert!(status.contains("a.txt (modified)"));
}

#[rstest]
#[tokio::test]
async fn file_checkout_reports_missing_files_and_commits(
    #[future] initialized_repository: TestRepository,
) {
    let mut test_repository = initialized_repository.await;
    let head = test_repository.commit_files(&[("a.txt", "a")], "add a").await;

    let missing_file = test_repository
        .repository
        .checkout_file("b.txt")
        .await
        .unwrap_err();
    let missing_commit = test_repository
        .repository
        .checkout_file_from("0000000", "a.txt")
        .await
        .unwrap_err();
    let missing_in_commit = test_repository
        .repository
        .checkout_file_from(head.as_ref(), "b.txt")
        .await
        .unwrap_err();

    assert_eq!(kind(missing_file), TwigError::FileNotInCommit("b.txt".to_string()));
    assert_eq!(kind(missing_commit), TwigError::NoSuchCommit("0000000".to_string()));
    assert_eq!(
        kind(missing_in_commit),
        TwigError::FileNotInCommit("b.txt".to_string())
    );
}

#[rstest]
#[tokio::test]
async fn branch_checkout_migrates_the_working_tree(
    #[future] initialized_repository: TestRepository,
) {
    let mut test_repository = initialized_repository.await;
    test_repository
        .commit_files(&[("shared.txt", "base"), ("master_only.txt", "m")], "base")
        .await;
    test_repository.repository.branch("topic").unwrap();
    test_repository.repository.checkout_branch("topic").await.unwrap();
    test_repository.repository.remove("master_only.txt").await.unwrap();
    test_repository
        .commit_files(&[("shared.txt", "topic"), ("nested/topic.txt", "t")], "topic work")
        .await;

    test_repository.repository.checkout_branch("master").await.unwrap();

    assert_eq!(
        test_repository.repository.refs().active_branch().unwrap(),
        BranchName::default_branch()
    );
    assert_eq!(test_repository.read("shared.txt"), "base");
    assert_eq!(test_repository.read("master_only.txt"), "m");
    assert!(!test_repository.exists("nested"));

    test_repository.repository.checkout_branch("topic").await.unwrap();

    assert_eq!(test_repository.read("shared.txt"), "topic");
    assert_eq!(test_repository.read("nested/topic.txt"), "t");
    assert!(!test_repository.exists("master_only.txt"));
}

#[rstest]
#[tokio::test]
async fn branch_checkout_clears_the_stage_and_keeps_untracked_files(
    #[future] initialized_repository: TestRepository,
) {
    let mut test_repository = initialized_repository.await;
    test_repository.repository.branch("topic").unwrap();
    test_repository.write("staged.txt", "s");
    test_repository.write("untracked.txt", "u");
    test_repository
        .repository
        .add(&["staged.txt".to_string()])
        .await
        .unwrap();

    test_repository.repository.checkout_branch("topic").await.unwrap();
    test_repository.repository.status().await.unwrap();

    let status = test_repository.take_output();
    assert!(status.contains("=== Staged Files ===\n\n"));
    assert!(status.contains("=== Untracked Files ===\nstaged.txt\nuntracked.txt\n"));
}

#[rstest]
#[tokio::test]
async fn branch_checkout_preconditions(#[future] initialized_repository: TestRepository) {
    let mut test_repository = initialized_repository.await;

    let missing = test_repository
        .repository
        .checkout_branch("nope")
        .await
        .unwrap_err();
    let current = test_repository
        .repository
        .checkout_branch("master")
        .await
        .unwrap_err();

    assert_eq!(kind(missing), TwigError::NoSuchBranch("nope".to_string()));
    assert_eq!(kind(current), TwigError::AlreadyOnBranch("master".to_string()));
}

#[rstest]
#[tokio::test]
async fn untracked_file_in_the_way_aborts_branch_checkout(
    #[future] initialized_repository: TestRepository,
) {
    let mut test_repository = initialized_repository.await;
    test_repository.repository.branch("topic").unwrap();
    test_repository
        .commit_files(&[("a.txt", "master"), ("b.txt", "master")], "master work")
        .await;
    test_repository.repository.checkout_branch("topic").await.unwrap();
    test_repository.write("b.txt", "mine, untracked");
    test_repository.commit_files(&[("c.txt", "topic")], "topic work").await;

    let error = test_repository
        .repository
        .checkout_branch("master")
        .await
        .unwrap_err();

    assert_eq!(
        kind(error),
        TwigError::UntrackedFileConflict(vec!["b.txt".to_string()])
    );
    assert_eq!(
        test_repository.repository.refs().active_branch().unwrap().as_ref(),
        "topic"
    );
    assert_eq!(test_repository.read("b.txt"), "mine, untracked");
    assert_eq!(test_repository.read("c.txt"), "topic");
    assert!(!test_repository.exists("a.txt"));
}

#[rstest]
#[tokio::test]
async fn reset_moves_the_active_branch_and_the_working_tree(
    #[future] initialized_repository: TestRepository,
) {
    let mut test_repository = initialized_repository.await;
    let first = test_repository.commit_files(&[("a.txt", "1")], "first").await;
    test_repository
        .commit_files(&[("a.txt", "2"), ("b.txt", "b")], "second")
        .await;
    test_repository.write("staged.txt", "s");
    test_repository
        .repository
        .add(&["staged.txt".to_string()])
        .await
        .unwrap();

    test_repository
        .repository
        .reset(&first.to_short_oid())
        .await
        .unwrap();

    assert_eq!(test_repository.head(), first);
    assert_eq!(test_repository.read("a.txt"), "1");
    assert!(!test_repository.exists("b.txt"));
    test_repository.repository.status().await.unwrap();
    assert!(
        test_repository
            .take_output()
            .contains("=== Staged Files ===\n\n")
    );
}

#[rstest]
#[tokio::test]
async fn reset_to_an_unknown_commit_fails(#[future] initialized_repository: TestRepository) {
    let mut test_repository = initialized_repository.await;
    let head = test_repository.head();

    let error = test_repository.repository.reset("abcdef0").await.unwrap_err();

    assert_eq!(kind(error), TwigError::NoSuchCommit("abcdef0".to_string()));
    assert_eq!(test_repository.head(), head);
}
