//! Command-line behaviour of the `pdf-footer-merge` binary

mod common;

use assert_cmd::Command;
use common::{files_with_prefix, write_pdf};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::cargo_bin("pdf-footer-merge").expect("binary should be built")
}

#[test]
fn test_missing_folder_argument() {
    let work_dir = TempDir::new().unwrap();

    cli()
        .current_dir(work_dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Folder path is required"))
        .stderr(predicate::str::contains("Usage"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_folder_is_merged() {
    let temp_dir = TempDir::new().unwrap();
    let folder = temp_dir.path().join("slides");
    fs::create_dir(&folder).unwrap();
    write_pdf(&folder.join("a.pdf"), "a", 2);
    write_pdf(&folder.join("b.pdf"), "b", 1);
    let work_dir = TempDir::new().unwrap();

    cli()
        .current_dir(work_dir.path())
        .arg(&folder)
        .assert()
        .success()
        .stderr(predicate::str::contains("a (pages 1-2)"))
        .stderr(predicate::str::contains("b (pages 3-3)"));

    assert!(folder.join("slides_combined.pdf").exists());
    assert!(files_with_prefix(work_dir.path(), "stamped_").is_empty());
}

#[test]
fn test_non_directory_argument() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("single.pdf");
    write_pdf(&file, "single", 1);

    cli()
        .current_dir(temp_dir.path())
        .arg(&file)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Not a directory"));
}
