use dedupe::actions::{Action, DUPLICATES_DIR};
use dedupe::duplicates::{run, DedupeConfig, Deduplicator};
use dedupe::scanner::HashAlgorithm;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) {
    File::create(dir.join(name))
        .unwrap()
        .write_all(content)
        .unwrap();
}

fn names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let summary = run(dir.path(), HashAlgorithm::Md5, Action::MoveAside).unwrap();

    assert!(!summary.has_duplicates());
    assert_eq!(summary.files_scanned, 0);
    assert!(!dir.path().join(DUPLICATES_DIR).exists());
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"content a");
    write(dir.path(), "b.txt", b"content b");
    write(dir.path(), "c.txt", b"content c");

    let summary = run(dir.path(), HashAlgorithm::Md5, Action::MoveAside).unwrap();

    assert_eq!(summary.files_scanned, 3);
    assert_eq!(summary.duplicate_groups, 0);
    assert_eq!(
        names(dir.path()),
        BTreeSet::from(["a.txt", "b.txt", "c.txt"].map(String::from))
    );
}

#[test]
fn test_move_aside_keeps_one_copy() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"hello");
    write(dir.path(), "b.txt", b"hello");
    write(dir.path(), "c.txt", b"world");

    let summary = run(dir.path(), HashAlgorithm::Md5, Action::MoveAside).unwrap();

    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.files_removed, 1);
    assert_eq!(summary.bytes_reclaimed, 5);

    let group = &summary.groups[0];
    assert_eq!(group.fingerprint, "5d41402abc4b2a76b9719d911017c592");
    let moved = &group.removed[0].name;
    assert_ne!(&group.kept, moved);

    let top = names(dir.path());
    assert!(top.contains(&group.kept));
    assert!(!top.contains(moved));
    assert!(top.contains("c.txt"));
    assert!(top.contains(DUPLICATES_DIR));

    let duplicates = dir.path().join(DUPLICATES_DIR);
    assert_eq!(names(&duplicates), BTreeSet::from([moved.clone()]));
    assert_eq!(fs::read(duplicates.join(moved)).unwrap(), b"hello");
    assert_eq!(summary.duplicates_dir, Some(duplicates));
}

#[test]
fn test_delete_leaves_no_duplicates_dir() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.txt", b"same");
    write(dir.path(), "c.txt", b"same");

    let summary = run(dir.path(), HashAlgorithm::Md5, Action::Delete).unwrap();

    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.files_removed, 2);
    assert_eq!(names(dir.path()).len(), 1);
    assert!(!dir.path().join(DUPLICATES_DIR).exists());
    assert_eq!(summary.duplicates_dir, None);
}

#[test]
fn test_hidden_files_are_ignored() {
    let dir = tempdir().unwrap();
    write(dir.path(), ".a", b"x");
    write(dir.path(), ".b", b"x");

    let summary = run(dir.path(), HashAlgorithm::Md5, Action::Delete).unwrap();

    assert_eq!(summary.files_scanned, 0);
    assert!(!summary.has_duplicates());
    assert!(dir.path().join(".a").exists());
    assert!(dir.path().join(".b").exists());
}

#[test]
fn test_hidden_copy_of_visible_file_is_not_a_duplicate() {
    let dir = tempdir().unwrap();
    write(dir.path(), "visible.txt", b"same bytes");
    write(dir.path(), ".hidden.txt", b"same bytes");

    let summary = run(dir.path(), HashAlgorithm::Md5, Action::MoveAside).unwrap();

    assert_eq!(summary.files_scanned, 1);
    assert_eq!(summary.duplicate_groups, 0);
    assert_eq!(summary.files_removed, 0);
    assert_eq!(fs::read(dir.path().join("visible.txt")).unwrap(), b"same bytes");
    assert_eq!(fs::read(dir.path().join(".hidden.txt")).unwrap(), b"same bytes");
    assert!(!dir.path().join(DUPLICATES_DIR).exists());
}

#[test]
fn test_subdirectories_are_untouched() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("nested");
    fs::create_dir(&sub).unwrap();
    write(&sub, "a.txt", b"dup");
    write(&sub, "b.txt", b"dup");
    write(dir.path(), "c.txt", b"dup");

    let summary = run(dir.path(), HashAlgorithm::Md5, Action::Delete).unwrap();

    assert_eq!(summary.files_scanned, 1);
    assert!(!summary.has_duplicates());
    assert_eq!(names(&sub).len(), 2);
}

#[test]
fn test_second_run_is_idempotent() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"hello");
    write(dir.path(), "b.txt", b"hello");

    let first = run(dir.path(), HashAlgorithm::Md5, Action::MoveAside).unwrap();
    assert_eq!(first.files_removed, 1);
    let after_first = names(dir.path());

    let second = run(dir.path(), HashAlgorithm::Md5, Action::MoveAside).unwrap();
    assert!(!second.has_duplicates());
    assert_eq!(second.files_scanned, 1);
    assert_eq!(names(dir.path()), after_first);
}

#[test]
fn test_every_algorithm_finds_the_same_groups() {
    for algorithm in HashAlgorithm::ALL {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.bin", b"hello world");
        write(dir.path(), "b.bin", b"hello world");
        write(dir.path(), "c.bin", b"something else");

        let config = DedupeConfig::default()
            .with_algorithm(algorithm)
            .with_dry_run(true);
        let summary = Deduplicator::new(config).run(dir.path()).unwrap();

        assert_eq!(summary.duplicate_groups, 1, "{algorithm}");
        assert_eq!(summary.groups[0].fingerprint.len(), algorithm.digest_len());
        assert_eq!(summary.algorithm, algorithm);
    }
}

#[test]
fn test_sha1_fingerprint_in_summary() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"hello world");
    write(dir.path(), "b", b"hello world");

    let summary = run(dir.path(), HashAlgorithm::Sha1, Action::Delete).unwrap();

    assert_eq!(
        summary.groups[0].fingerprint,
        "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
    );
}

#[test]
fn test_empty_files_are_duplicates_of_each_other() {
    let dir = tempdir().unwrap();
    write(dir.path(), "empty1", b"");
    write(dir.path(), "empty2", b"");

    let summary = run(dir.path(), HashAlgorithm::Md5, Action::Delete).unwrap();

    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.groups[0].fingerprint, "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(summary.bytes_reclaimed, 0);
}

#[test]
fn test_multiple_groups_resolved_independently() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a1", b"aaa");
    write(dir.path(), "a2", b"aaa");
    write(dir.path(), "b1", b"bbb");
    write(dir.path(), "b2", b"bbb");
    write(dir.path(), "b3", b"bbb");

    let summary = run(dir.path(), HashAlgorithm::Blake3, Action::MoveAside).unwrap();

    assert_eq!(summary.duplicate_groups, 2);
    assert_eq!(summary.files_removed, 3);
    assert_eq!(names(&dir.path().join(DUPLICATES_DIR)).len(), 3);
    // two kept files plus duplicates/
    assert_eq!(names(dir.path()).len(), 3);
}
