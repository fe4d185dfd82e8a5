//! Directory transfer against the real filesystem

use async_trait::async_trait;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use wm_fs::{FileSystem, FsResult, LocalFileSystem, PathStat, PathTransferEngine, Transfer};

/// Local filesystem that reports everything under `other_root` as another device
struct SplitDevices {
    inner: LocalFileSystem,
    other_root: PathBuf,
}

#[async_trait]
impl FileSystem for SplitDevices {
    async fn stat(&self, path: &Path) -> FsResult<PathStat> {
        let mut stat = self.inner.stat(path).await?;
        if path.starts_with(&self.other_root) {
            stat.device_id = stat.device_id.wrapping_add(1);
        }
        Ok(stat)
    }

    async fn list_entries(&self, path: &Path) -> FsResult<Vec<OsString>> {
        self.inner.list_entries(path).await
    }

    async fn rename_entry(&self, _from: &Path, _to: &Path) -> FsResult<()> {
        panic!("rename must not be used across devices");
    }

    async fn copy_entry(&self, from: &Path, to: &Path) -> FsResult<()> {
        self.inner.copy_entry(from, to).await
    }

    async fn remove_directory(&self, path: &Path) -> FsResult<()> {
        self.inner.remove_directory(path).await
    }

    async fn ensure_dir(&self, path: &Path) -> FsResult<()> {
        self.inner.ensure_dir(path).await
    }
}

fn populate(source: &Path) {
    fs::create_dir_all(source.join("mod-a")).unwrap();
    fs::write(source.join("mod-a/archive.7z"), "payload-a").unwrap();
    fs::write(source.join("readme.txt"), "hello").unwrap();
}

fn assert_moved(source: &Path, destination: &Path) {
    assert!(!source.exists(), "source should be removed");
    assert_eq!(
        fs::read_to_string(destination.join("mod-a/archive.7z")).unwrap(),
        "payload-a"
    );
    assert_eq!(
        fs::read_to_string(destination.join("readme.txt")).unwrap(),
        "hello"
    );
    let mut names: Vec<_> = fs::read_dir(destination)
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    names.sort();
    assert_eq!(names, vec!["mod-a", "readme.txt"]);
}

#[tokio::test]
async fn test_transfer_same_device_moves_tree() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("old");
    let destination = dir.path().join("new");
    populate(&source);

    let engine = PathTransferEngine::new(LocalFileSystem::new(), 4);
    let report = engine.transfer(&source, &destination).await.unwrap();

    assert_eq!(report.renamed, 2);
    assert_moved(&source, &destination);
}

#[tokio::test]
async fn test_transfer_split_devices_copies_tree() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("old");
    let other_root = dir.path().join("other");
    let destination = other_root.join("new");
    populate(&source);

    let engine = PathTransferEngine::new(
        SplitDevices {
            inner: LocalFileSystem::new(),
            other_root,
        },
        1,
    );
    let report = engine.transfer(&source, &destination).await.unwrap();

    assert_eq!(report.copied, 2);
    assert_moved(&source, &destination);
}

#[tokio::test]
async fn test_transfer_twice_is_idempotent() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("old");
    let destination = dir.path().join("new");
    populate(&source);

    let engine = PathTransferEngine::new(LocalFileSystem::new(), 4);
    engine.transfer(&source, &destination).await.unwrap();
    let second = engine.transfer(&source, &destination).await.unwrap();

    assert!(second.source_missing);
    assert_moved(&source, &destination);
}

#[tokio::test]
async fn test_transfer_missing_source_does_not_create_destination() {
    let dir = tempdir().unwrap();
    let destination = dir.path().join("new");

    let engine = PathTransferEngine::new(LocalFileSystem::new(), 4);
    let report = engine
        .transfer(&dir.path().join("never-existed"), &destination)
        .await
        .unwrap();

    assert!(report.source_missing);
    assert!(!destination.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_transfer_split_devices_carries_dangling_link() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("old");
    let destination = dir.path().join("other/new");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("a.7z"), "a").unwrap();
    std::os::unix::fs::symlink(dir.path().join("missing"), source.join("stale")).unwrap();

    let engine = PathTransferEngine::new(
        SplitDevices {
            inner: LocalFileSystem::new(),
            other_root: dir.path().join("other"),
        },
        2,
    );
    let report = engine.transfer(&source, &destination).await.unwrap();

    assert_eq!(report.copied, 2);
    assert!(!source.exists());
    assert_eq!(fs::read_to_string(destination.join("a.7z")).unwrap(), "a");
    assert_eq!(
        fs::read_link(destination.join("stale")).unwrap(),
        dir.path().join("missing")
    );
}
