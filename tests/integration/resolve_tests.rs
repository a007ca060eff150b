use dedupe::actions::{Action, ResolveError, DUPLICATES_DIR};
use dedupe::duplicates::{run, DedupeConfig, DedupeError, Deduplicator};
use dedupe::scanner::{HashAlgorithm, Hasher};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_move_never_overwrites_earlier_duplicate() {
    let dir = tempdir().unwrap();
    write(dir.path(), "orig.txt", b"payload");
    write(dir.path(), "copy.txt", b"payload");

    let first = run(dir.path(), HashAlgorithm::Md5, Action::MoveAside).unwrap();
    let moved = first.groups[0].removed[0].name.clone();
    let kept = first.groups[0].kept.clone();

    // Recreate the moved copy, and occupy the kept name inside duplicates/
    // too, so whichever member the second run moves has to be renamed.
    let duplicates = dir.path().join(DUPLICATES_DIR);
    write(dir.path(), &moved, b"payload");
    write(&duplicates, &kept, b"payload");

    let second = run(dir.path(), HashAlgorithm::Md5, Action::MoveAside).unwrap();

    assert_eq!(second.files_removed, 1);
    let removal = &second.groups[0].removed[0];
    let destination = removal.destination.clone().unwrap();
    let tag = &Hasher::new(HashAlgorithm::Md5).hash_bytes(b"payload")[..8];
    let stem = Path::new(&removal.name).file_stem().unwrap().to_string_lossy();
    assert_eq!(
        destination.file_name().unwrap().to_string_lossy(),
        format!("{stem}-{tag}.txt")
    );

    assert_eq!(fs::read_dir(&duplicates).unwrap().count(), 3);
    assert_eq!(fs::read(&destination).unwrap(), b"payload");
    assert!(dir.path().join(&second.groups[0].kept).exists());
}

#[test]
fn test_dry_run_changes_nothing() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.txt", b"same");

    for action in [Action::MoveAside, Action::Delete] {
        let config = DedupeConfig::default()
            .with_action(action)
            .with_dry_run(true);
        let summary = Deduplicator::new(config).run(dir.path()).unwrap();

        assert!(summary.dry_run);
        assert_eq!(summary.files_removed, 1);
        assert!(dir.path().join("a.txt").exists());
        assert!(dir.path().join("b.txt").exists());
        assert!(!dir.path().join(DUPLICATES_DIR).exists());
    }
}

#[test]
fn test_dry_run_plans_move_destination() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.txt", b"same");

    let config = DedupeConfig::default().with_dry_run(true);
    let summary = Deduplicator::new(config).run(dir.path()).unwrap();

    let removal = &summary.groups[0].removed[0];
    assert_eq!(
        removal.destination,
        Some(dir.path().join(DUPLICATES_DIR).join(&removal.name))
    );
    assert_eq!(summary.duplicates_dir, Some(dir.path().join(DUPLICATES_DIR)));
}

#[test]
fn test_duplicates_name_taken_by_file_is_fatal() {
    let dir = tempdir().unwrap();
    write(dir.path(), DUPLICATES_DIR, b"i am a regular file");
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.txt", b"same");

    let result = run(dir.path(), HashAlgorithm::Md5, Action::MoveAside);

    match result {
        Err(DedupeError::Resolve(ResolveError::NotADirectory(path))) => {
            assert_eq!(path, dir.path().join(DUPLICATES_DIR));
        }
        other => panic!("Expected NotADirectory, got {:?}", other.map(|s| s.files_removed)),
    }
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_duplicates_name_taken_by_file_with_keep_going() {
    let dir = tempdir().unwrap();
    write(dir.path(), DUPLICATES_DIR, b"i am a regular file");
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.txt", b"same");

    let config = DedupeConfig::default().with_continue_on_error(true);
    let summary = Deduplicator::new(config).run(dir.path()).unwrap();

    assert!(summary.is_partial());
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.files_removed, 0);
    assert_eq!(summary.duplicates_dir, None);
}

#[test]
fn test_delete_with_parallel_hashing() {
    let dir = tempdir().unwrap();
    for i in 0..40 {
        write(dir.path(), &format!("file{i:02}"), format!("group {}", i % 4).as_bytes());
    }

    let config = DedupeConfig::default()
        .with_action(Action::Delete)
        .with_io_threads(8)
        .with_chunk_size(3);
    let summary = Deduplicator::new(config).run(dir.path()).unwrap();

    assert_eq!(summary.files_scanned, 40);
    assert_eq!(summary.duplicate_groups, 4);
    assert_eq!(summary.files_removed, 36);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 4);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_with_keep_going() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.txt", b"same");
    let locked = dir.path().join("locked.txt");
    write(dir.path(), "locked.txt", b"secret");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read the file.
    if fs::read(&locked).is_ok() {
        return;
    }

    let strict = run(dir.path(), HashAlgorithm::Md5, Action::Delete);
    assert!(matches!(strict, Err(DedupeError::Hash(_))));
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("b.txt").exists());

    let config = DedupeConfig::default()
        .with_action(Action::Delete)
        .with_continue_on_error(true);
    let summary = Deduplicator::new(config).run(dir.path()).unwrap();

    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].path, locked);
    assert_eq!(summary.files_removed, 1);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
}
