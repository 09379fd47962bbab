//! Edge case and error handling tests for sprig


use harness::{TestDir, run_sprig};
use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::Path;

use sprig::{Error, MockNode, ParseOptions, RenderOptions, parse_tree, render_path};

// ============================================================================
// Symlink Edge Cases
// ============================================================================

#[test]
fn test_symlink_to_directory_is_followed() {
    let dir = TestDir::new();
    dir.add_file("realdir/file.rs", "fn file() {}");
    symlink(dir.path().join("realdir"), dir.path().join("linkdir"))
        .expect("Failed to create dir symlink");

    let (stdout, _stderr, success) = run_sprig(dir.path(), &[]);
    assert!(success, "sprig should succeed with directory symlink");
    assert!(stdout.contains("├─linkdir/\n│ └─file.rs"), "{}", stdout);
    assert!(stdout.contains("└─realdir/\n  └─file.rs"), "{}", stdout);
}

#[test]
fn test_symlink_to_parent_terminates_with_level() {
    let dir = TestDir::new();
    dir.add_file("subdir/file.rs", "fn file() {}");
    symlink("..", dir.path().join("subdir").join("parent"))
        .expect("Failed to create parent symlink");

    let (stdout, _stderr, success) = run_sprig(dir.path(), &["-L", "3"]);
    assert!(success, "sprig should stop at the level limit");
    assert!(stdout.contains("subdir"));
    assert!(stdout.contains("file.rs"));
    // root, subdir, file.rs, parent, and subdir again at the limit
    assert_eq!(stdout.lines().count(), 5);
}

#[test]
fn test_broken_symlink_is_a_file() {
    let dir = TestDir::new();
    dir.add_file("real.rs", "fn real() {}");
    symlink("nonexistent.rs", dir.path().join("broken_link.rs"))
        .expect("Failed to create broken symlink");

    let (stdout, _stderr, success) = run_sprig(dir.path(), &[]);
    assert!(success, "sprig should handle broken symlinks");
    assert!(stdout.contains("├─broken_link.rs\n"));
    assert!(stdout.contains("└─real.rs\n"));
}

#[test]
fn test_self_referential_symlink() {
    let dir = TestDir::new();
    dir.add_file("file.rs", "fn file() {}");
    symlink("selfref", dir.path().join("selfref"))
        .expect("Failed to create self-referential symlink");

    let (stdout, _stderr, success) = run_sprig(dir.path(), &[]);
    assert!(success, "sprig should handle self-referential symlinks");
    assert!(stdout.contains("selfref"));
    assert!(stdout.contains("file.rs"));
}

// ============================================================================
// Permission Error Handling
// ============================================================================

/// Make `path` unreadable. Returns false when the current user can read it
/// anyway (e.g. root), in which case the test has nothing to check.
fn lock(path: &Path) -> bool {
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o000);
    fs::set_permissions(path, perms).expect("Failed to set permissions");
    fs::read_dir(path).is_err()
}

fn unlock(path: &Path) {
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("Failed to restore permissions");
}

#[test]
fn test_unreadable_directory_fails_by_default() {
    let dir = TestDir::new();
    dir.add_file("readable/file.rs", "");
    let locked = dir.add_dir("unreadable");
    dir.add_file("unreadable/hidden.rs", "");

    let effective = lock(&locked);
    let (stdout, stderr, success) = run_sprig(dir.path(), &[]);
    unlock(&locked);

    if effective {
        assert!(!success);
        assert!(stdout.is_empty(), "a failed render prints nothing");
        assert!(stderr.contains("cannot list"), "stderr: {}", stderr);
        assert!(stderr.contains("unreadable"));
    }
}

#[test]
fn test_unreadable_directory_with_ignore_denied() {
    let dir = TestDir::new();
    dir.add_file("readable/file.rs", "");
    let locked = dir.add_dir("unreadable");

    let effective = lock(&locked);
    let (stdout, _stderr, success) = run_sprig(
        dir.path(),
        &["--ignore-denied", "--denied-string", "<locked>"],
    );
    unlock(&locked);

    assert!(success, "sprig should render around unreadable folders");
    assert!(stdout.contains("├─readable/\n│ └─file.rs"));
    if effective {
        assert!(stdout.contains("└─unreadable/\n  └─<locked>"), "{}", stdout);
    }
}

// ============================================================================
// Special Filenames
// ============================================================================

#[test]
fn test_filename_with_spaces() {
    let dir = TestDir::new();
    dir.add_file("file with spaces.rs", "");
    dir.add_file("dir with spaces/nested.rs", "");

    let (stdout, _stderr, success) = run_sprig(dir.path(), &[]);
    assert!(success, "sprig should handle spaces in filenames");
    assert!(stdout.contains("├─dir with spaces/\n│ └─nested.rs"));
    assert!(stdout.contains("└─file with spaces.rs"));
}

#[test]
fn test_filename_with_unicode() {
    let dir = TestDir::new();
    dir.add_file("日本語.rs", "");
    dir.add_file("émoji_🎉.rs", "");
    dir.add_file("中文目录/文件.rs", "");

    let (stdout, _stderr, success) = run_sprig(dir.path(), &[]);
    assert!(success, "sprig should handle unicode filenames");
    assert!(stdout.contains("日本語.rs"));
    assert!(stdout.contains("émoji_🎉.rs"));
    assert!(stdout.contains("中文目录/"));
}

#[test]
fn test_empty_directory() {
    let dir = TestDir::new();
    let (stdout, _stderr, success) = run_sprig(dir.path(), &[]);
    assert!(success);
    assert_eq!(stdout, format!("{}/\n", dir.root_name()));
}

#[test]
fn test_file_as_root() {
    let dir = TestDir::new();
    dir.add_file("solo.txt", "x");
    let (stdout, _stderr, success) = run_sprig(dir.path(), &["solo.txt"]);
    assert!(success);
    assert_eq!(stdout, "solo.txt\n");
}

#[test]
fn test_deep_nesting() {
    let dir = TestDir::new();
    let deep = (0..40).map(|i| format!("d{}", i)).collect::<Vec<_>>().join("/");
    dir.add_file(&format!("{}/leaf.txt", deep), "");

    let (stdout, _stderr, success) = run_sprig(dir.path(), &[]);
    assert!(success);
    assert_eq!(stdout.lines().count(), 42);
    let last = stdout.lines().last().unwrap();
    assert_eq!(last, format!("{}└─leaf.txt", "  ".repeat(40)));
}

// ============================================================================
// Library-level checks against a real directory
// ============================================================================

#[test]
fn test_snapshot_renders_like_the_directory() {
    let dir = TestDir::new();
    dir.add_file("b/c.txt", "");
    dir.add_file("b/d/e.md", "");
    dir.add_file("a.txt", "");
    dir.add_dir("empty");

    let options = RenderOptions {
        sort: true,
        first: Some(sprig::First::Folders),
        exclude_files: vec!["a.txt".to_string()],
        ..Default::default()
    };
    let from_disk = render_path(dir.path(), &options).unwrap();
    let snapshot = MockNode::from_dir(dir.path(), &options).unwrap();
    assert_eq!(snapshot.render(&options).unwrap(), from_disk);
}

#[test]
fn test_snapshot_with_content_beyond_renders_like_the_directory() {
    let dir = TestDir::new();
    dir.add_file("b/c.txt", "");
    dir.add_file("b/d.txt", "");
    dir.add_file("a.txt", "");

    let limited = |item_limit| RenderOptions {
        depth_limit: Some(1),
        item_limit,
        beyond: Some(sprig::Beyond::Content),
        ..Default::default()
    };
    let cases = [
        (limited(None), "└─b/\n  └─0 folder(s), 2 file(s)"),
        (
            limited(Some(sprig::ItemLimit::Total(1))),
            "├─a.txt\n└─1 folder(s), 0 file(s)",
        ),
    ];

    for (options, tail) in cases {
        let from_disk = render_path(dir.path(), &options).unwrap();
        assert!(from_disk.ends_with(tail), "{}", from_disk);
        let snapshot = MockNode::from_dir(dir.path(), &options).unwrap();
        assert_eq!(snapshot.render(&options).unwrap(), from_disk);
    }
}

#[test]
fn test_realize_then_parse_round_trip() {
    let dir = TestDir::new();
    let root = parse_tree(
        "proj/\n├─src/\n│ └─main.rs\n└─Cargo.toml",
        &ParseOptions::default(),
    )
    .unwrap();
    root.realize(dir.path()).unwrap();

    let rendered = render_path(dir.path().join("proj"), &RenderOptions::default()).unwrap();
    assert_eq!(rendered, "proj/\n├─Cargo.toml\n└─src/\n  └─main.rs");
}

#[test]
fn test_render_missing_path_is_io_error() {
    let dir = TestDir::new();
    let err = render_path(dir.path().join("nope"), &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}
