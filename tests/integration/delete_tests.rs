use dupfinder::actions::{delete_batch, delete_file, ActionError, DeleteConfig};
use dupfinder::duplicates::Classifier;
use dupfinder::scanner::{Walker, WalkerConfig};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_delete_all_duplicates_then_rescan_is_clean() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();
    fs::write(dir.path().join("c.txt"), "world").unwrap();
    fs::write(sub.join("d.txt"), "world").unwrap();
    fs::write(sub.join("e.txt"), "hello").unwrap();

    let walker = Walker::new(dir.path(), WalkerConfig::default());
    let classifier = Classifier::with_defaults();

    let first = classifier
        .classify(&walker.collect().unwrap().files)
        .unwrap();
    assert_eq!(first.duplicate_count(), 3);

    let batch = delete_batch(&first.duplicate_paths(), &DeleteConfig::permanent(), None);
    assert!(batch.all_succeeded());
    assert_eq!(batch.bytes_freed, 15);

    let second = classifier
        .classify(&walker.collect().unwrap().files)
        .unwrap();
    assert!(!second.has_duplicates());
    assert_eq!(second.unique, first.unique);
}

#[test]
fn test_delete_reports_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested-name.txt");
    fs::write(&path, "x").unwrap();

    let outcome = delete_file(&path).unwrap();

    assert_eq!(outcome.name(), "nested-name.txt");
    assert_eq!(outcome.status_line(), "nested-name.txt deleted");
}

#[test]
fn test_delete_twice_fails_with_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("once.txt");
    fs::write(&path, "x").unwrap();

    delete_file(&path).unwrap();
    let err = delete_file(&path).unwrap_err();

    assert!(matches!(err, ActionError::PathNotFound(p) if p == path));
}

#[test]
fn test_batch_keeps_going_after_vanished_file() {
    let dir = tempdir().unwrap();
    let paths: Vec<_> = (0..4).map(|i| dir.path().join(format!("f{}", i))).collect();
    for p in &paths {
        fs::write(p, "data").unwrap();
    }
    fs::remove_file(&paths[1]).unwrap();

    let batch = delete_batch(&paths, &DeleteConfig::default(), None);

    assert_eq!(batch.success_count(), 3);
    assert_eq!(batch.failure_count(), 1);
    assert_eq!(batch.failures[0].path(), paths[1].as_path());
    assert!(paths.iter().all(|p| !p.exists()));
}
