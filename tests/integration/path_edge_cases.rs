use dupfinder::duplicates::Classifier;
use dupfinder::scanner::path_utils::{contains_string, file_name};
use dupfinder::scanner::{Walker, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

fn duplicate_count(root: &std::path::Path) -> usize {
    let outcome = Walker::new(root, WalkerConfig::default()).collect().unwrap();
    Classifier::with_defaults()
        .classify(&outcome.files)
        .unwrap()
        .duplicate_count()
}

#[test]
fn test_paths_with_spaces_and_unicode() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("my documents");
    fs::create_dir(&sub).unwrap();

    File::create(sub.join("résumé final.txt"))
        .unwrap()
        .write_all(b"content")
        .unwrap();
    File::create(dir.path().join("文件.txt"))
        .unwrap()
        .write_all(b"content")
        .unwrap();

    assert_eq!(duplicate_count(dir.path()), 1);
}

#[test]
fn test_paths_with_quotes() {
    let dir = tempdir().unwrap();

    // Windows does not allow double quotes in filenames.
    if cfg!(not(windows)) {
        fs::write(dir.path().join("file_with_\"quote\".txt"), "content").unwrap();
        fs::write(dir.path().join("duplicate.txt"), "content").unwrap();

        assert_eq!(duplicate_count(dir.path()), 1);
    }
}

#[test]
fn test_deeply_nested_tree() {
    let dir = tempdir().unwrap();
    let mut deep = dir.path().to_path_buf();
    for i in 0..20 {
        deep = deep.join(format!("level{}", i));
    }
    fs::create_dir_all(&deep).unwrap();
    fs::write(deep.join("bottom.txt"), "deep").unwrap();
    fs::write(dir.path().join("top.txt"), "deep").unwrap();

    let outcome = Walker::new(dir.path(), WalkerConfig::default()).collect().unwrap();
    let result = Classifier::with_defaults().classify(&outcome.files).unwrap();

    // "level0" sorts before "top.txt", so the deep copy is the original.
    assert_eq!(result.unique, vec![deep.join("bottom.txt")]);
    assert_eq!(result.duplicate_paths(), vec![dir.path().join("top.txt")]);
}

#[test]
fn test_file_name_helper() {
    assert_eq!(file_name("/path/to/file.ext"), "file.ext");
    assert_eq!(file_name("file.ext"), "file.ext");
    assert_eq!(file_name("/path/to/dir/"), "");
}

#[test]
fn test_contains_string_helper() {
    assert!(contains_string(&["a"], "a"));
    assert!(!contains_string(&["a"], "b"));
    assert!(!contains_string::<&str>(&[], "a"));
}
