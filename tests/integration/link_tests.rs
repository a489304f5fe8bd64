use dupfinder::actions::{hard_link, link_batch, replace_with_link, soft_link, ActionError, LinkKind};
use dupfinder::duplicates::Classifier;
use dupfinder::scanner::{Walker, WalkerConfig};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_hard_link_existing_destination_requires_force() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src.txt");
    let dest = dir.path().join("dest.txt");
    fs::write(&src, "identical content").unwrap();
    fs::write(&dest, "identical content").unwrap();

    let err = hard_link(&src, &dest, false).unwrap_err();
    assert!(matches!(err, ActionError::DestinationExists(_)));

    hard_link(&src, &dest, true).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        assert_eq!(
            fs::metadata(&src).unwrap().ino(),
            fs::metadata(&dest).unwrap().ino()
        );
    }
    assert_eq!(fs::read_to_string(&dest).unwrap(), "identical content");
}

#[test]
fn test_link_writes_through_to_original() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src.txt");
    let dest = dir.path().join("dest.txt");
    fs::write(&src, "v1").unwrap();
    fs::write(&dest, "v1").unwrap();

    replace_with_link(&src, &dest, LinkKind::Hard).unwrap();
    fs::write(&src, "v2").unwrap();

    assert_eq!(fs::read_to_string(&dest).unwrap(), "v2");
}

#[test]
fn test_soft_link_missing_source() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("dest.txt");

    let err = soft_link(&dir.path().join("missing"), &dest, false).unwrap_err();

    assert!(matches!(err, ActionError::PathNotFound(_)));
    assert!(!dest.exists());
}

#[cfg(unix)]
#[test]
fn test_link_pass_over_scan_result() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();
    fs::write(dir.path().join("c.txt"), "hello").unwrap();

    let walker = Walker::new(dir.path(), WalkerConfig::default());
    let result = Classifier::with_defaults()
        .classify(&walker.collect().unwrap().files)
        .unwrap();

    let batch = link_batch(&result.duplicates, LinkKind::Soft, None);

    assert_eq!(batch.success_count(), 2);
    for name in ["b.txt", "c.txt"] {
        let path = dir.path().join(name);
        assert!(fs::symlink_metadata(&path).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    // Symlinks are not walked, so only the original remains.
    let rescan = Classifier::with_defaults()
        .classify(&walker.collect().unwrap().files)
        .unwrap();
    assert_eq!(rescan.total_files, 1);
}
