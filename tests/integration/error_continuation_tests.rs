use dupfinder::actions::{delete_batch, DeleteConfig};
use dupfinder::duplicates::{classify, Classifier, ClassifierConfig, ScanStrategy};
use dupfinder::scanner::{FileEntry, FingerprintError, Fingerprinter};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_classify_continues_on_missing_files() {
    let file1 = FileEntry::new(PathBuf::from("nonexistent_1.txt"));
    let file2 = FileEntry::new(PathBuf::from("nonexistent_2.txt"));

    let result = Classifier::with_defaults().classify(&[file1, file2]).unwrap();

    assert!(result.unique.is_empty());
    assert!(result.duplicates.is_empty());
    assert_eq!(result.failures.len(), 2);
    for err in &result.failures {
        match err {
            FingerprintError::PathNotFound(_) => {}
            other => panic!("Expected PathNotFound, got: {:?}", other),
        }
    }
}

#[test]
fn test_strict_mode_fails_fast() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ok.txt"), "ok").unwrap();
    let files = vec![
        FileEntry::new(dir.path().join("ok.txt")),
        FileEntry::new(dir.path().join("gone.txt")),
    ];

    for strategy in [ScanStrategy::Full, ScanStrategy::Fast, ScanStrategy::Verified] {
        let config = ClassifierConfig::default()
            .with_strategy(strategy)
            .with_strict(true);
        match Classifier::new(config).classify(&files) {
            Err(FingerprintError::PathNotFound(p)) => assert!(p.ends_with("gone.txt")),
            other => panic!("{}: expected PathNotFound, got {:?}", strategy, other),
        }
    }
}

#[test]
fn test_directory_is_skipped_and_reported() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("folder");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("a"), "x").unwrap();
    fs::write(dir.path().join("b"), "x").unwrap();

    let files = vec![
        FileEntry::new(dir.path().join("a")),
        FileEntry::new(sub.clone()),
        FileEntry::new(dir.path().join("b")),
    ];
    let result = Classifier::with_defaults().classify(&files).unwrap();

    assert_eq!(result.unique_count(), 1);
    assert_eq!(result.duplicate_count(), 1);
    assert!(matches!(&result.failures[..], [FingerprintError::PathIsDirectory(p)] if *p == sub));
}

#[test]
fn test_custom_fingerprint_function_failures() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "x").unwrap();
    fs::write(dir.path().join("b"), "x").unwrap();
    let hasher = Fingerprinter::default();

    let files = vec![
        FileEntry::new(dir.path().join("a")),
        FileEntry::new(dir.path().join("b")),
        FileEntry::new(dir.path().join("missing")),
    ];
    let result = classify(&files, |p| hasher.fingerprint(p));

    assert_eq!(result.total_files, 3);
    assert_eq!(result.unique_count(), 1);
    assert_eq!(result.duplicate_count(), 1);
    assert_eq!(result.failure_count(), 1);
}

#[test]
fn test_repeated_path_never_marked_duplicate_of_itself() {
    let dir = tempdir().unwrap();
    let only = dir.path().join("only");
    fs::write(&only, "x").unwrap();
    let hasher = Fingerprinter::default();

    let files = vec![FileEntry::new(&only), FileEntry::new(&only)];
    let result = classify(&files, |p| hasher.fingerprint(p));

    assert_eq!(result.total_files, 1);
    assert_eq!(result.unique, vec![only.clone()]);
    assert!(!result.is_duplicate(&only));

    // Nothing to delete, so the only copy survives a resolution pass.
    let batch = delete_batch(&result.duplicate_paths(), &DeleteConfig::permanent(), None);
    assert_eq!(batch.success_count(), 0);
    assert!(only.exists());
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::write(dir.path().join("a"), "dup").unwrap();
    fs::write(&locked, "dup").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read anything; nothing to test then.
    if fs::read(&locked).is_ok() {
        return;
    }

    let files = vec![
        FileEntry::new(dir.path().join("a")),
        FileEntry::new(locked.clone()),
    ];
    let result = Classifier::with_defaults().classify(&files).unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(result.unique_count(), 1);
    assert_eq!(result.duplicate_count(), 0);
    assert!(matches!(result.failures[0], FingerprintError::Io { .. }));
}
