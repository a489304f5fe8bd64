use dupfinder::duplicates::{ClassificationResult, Classifier, ClassifierConfig, ScanStrategy};
use dupfinder::scanner::{HashAlgorithm, Walker, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn scan(root: &Path, walker: WalkerConfig, classifier: ClassifierConfig) -> ClassificationResult {
    let outcome = Walker::new(root, walker).collect().unwrap();
    Classifier::new(classifier).classify(&outcome.files).unwrap()
}

fn scan_default(root: &Path) -> ClassificationResult {
    scan(root, WalkerConfig::default(), ClassifierConfig::default())
}

fn names(result: &[std::path::PathBuf]) -> Vec<String> {
    result
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let result = scan_default(dir.path());

    assert_eq!(result.total_files, 0);
    assert!(!result.has_duplicates());
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    for (name, content) in [("a.txt", "content a"), ("b.txt", "content b"), ("c.txt", "content c")] {
        File::create(dir.path().join(name))
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
    }

    let result = scan_default(dir.path());

    assert_eq!(result.total_files, 3);
    assert_eq!(result.unique_count(), 3);
    assert_eq!(result.duplicate_count(), 0);
}

#[test]
fn test_scan_hello_world() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();
    fs::write(dir.path().join("c.txt"), "world").unwrap();

    let result = scan_default(dir.path());

    assert_eq!(names(&result.unique), vec!["a.txt", "c.txt"]);
    assert_eq!(names(&result.duplicate_paths()), vec!["b.txt"]);
    assert_eq!(
        result.summary_line(),
        "Total file(s): 3  Unique file(s): 2  Duplicate file(s): 1"
    );
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    fs::write(sub.join("b.txt"), "same").unwrap();
    fs::write(dir.path().join("z.txt"), "same").unwrap();

    let result = scan_default(dir.path());

    // Depth-first, name-sorted: a.txt, subdir/b.txt, z.txt
    assert_eq!(result.unique, vec![dir.path().join("a.txt")]);
    assert_eq!(
        result.duplicate_paths(),
        vec![sub.join("b.txt"), dir.path().join("z.txt")]
    );
}

#[test]
fn test_scan_non_recursive() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    fs::write(sub.join("b.txt"), "same").unwrap();

    let result = scan(
        dir.path(),
        WalkerConfig::default().with_recursive(false),
        ClassifierConfig::default(),
    );

    assert_eq!(result.total_files, 1);
    assert!(!result.has_duplicates());
}

#[test]
fn test_scan_skips_git_directory() {
    let dir = tempdir().unwrap();
    let git = dir.path().join(".git");
    fs::create_dir(&git).unwrap();
    fs::write(git.join("HEAD"), "ref").unwrap();
    fs::write(dir.path().join("HEAD"), "ref").unwrap();

    let result = scan_default(dir.path());

    assert_eq!(result.total_files, 1);
    assert!(!result.has_duplicates());
}

#[test]
fn test_scan_with_exclusions() {
    let dir = tempdir().unwrap();
    let cache = dir.path().join("node_modules");
    fs::create_dir(&cache).unwrap();
    fs::write(dir.path().join("keep.txt"), "x").unwrap();
    fs::write(dir.path().join("keep.bak"), "x").unwrap();
    fs::write(cache.join("dep.txt"), "x").unwrap();

    let walker = WalkerConfig::default().with_exclude(vec![".bak".into(), "node_modules".into()]);
    let result = scan(dir.path(), walker, ClassifierConfig::default());

    assert_eq!(names(&result.unique), vec!["keep.txt"]);
    assert!(!result.has_duplicates());
}

#[test]
fn test_scan_exclude_empty() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1")).unwrap();
    File::create(dir.path().join("empty2")).unwrap();

    let with_empty = scan_default(dir.path());
    assert_eq!(with_empty.duplicate_count(), 1);

    let without = scan(
        dir.path(),
        WalkerConfig::default().with_exclude_empty(true),
        ClassifierConfig::default(),
    );
    assert_eq!(without.total_files, 0);
}

#[test]
fn test_algorithms_agree_on_partition() {
    let dir = tempdir().unwrap();
    for i in 0..10 {
        fs::write(dir.path().join(format!("f{}", i)), format!("{}", i % 3)).unwrap();
    }

    let sha = scan_default(dir.path());
    let blake = scan(
        dir.path(),
        WalkerConfig::default(),
        ClassifierConfig::default().with_algorithm(HashAlgorithm::Blake3),
    );

    assert_eq!(sha.unique, blake.unique);
    assert_eq!(sha.duplicate_paths(), blake.duplicate_paths());
    assert_ne!(sha.duplicates[0].fingerprint, blake.duplicates[0].fingerprint);
}

#[test]
fn test_strategies_and_jobs_agree_on_plain_tree() {
    let dir = tempdir().unwrap();
    for i in 0..30 {
        fs::write(dir.path().join(format!("f{:02}", i)), vec![(i % 5) as u8; 1000]).unwrap();
    }

    let full = scan_default(dir.path());
    for strategy in [ScanStrategy::Fast, ScanStrategy::Verified] {
        for jobs in [1, 3] {
            let other = scan(
                dir.path(),
                WalkerConfig::default(),
                ClassifierConfig::default()
                    .with_strategy(strategy)
                    .with_jobs(jobs),
            );
            assert_eq!(other.unique, full.unique, "{} / {} jobs", strategy, jobs);
            assert_eq!(other.duplicate_paths(), full.duplicate_paths());
        }
    }
}

#[test]
fn test_rescan_is_idempotent() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "1").unwrap();
    fs::write(dir.path().join("b"), "1").unwrap();
    fs::write(dir.path().join("c"), "2").unwrap();

    let first = scan_default(dir.path());
    let second = scan_default(dir.path());

    assert_eq!(first.unique, second.unique);
    assert_eq!(first.duplicates, second.duplicates);
}
