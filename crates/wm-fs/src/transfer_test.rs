use super::*;
use crate::traits::PathStat;
use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Dir,
    File(String),
}

/// In-memory filesystem with configurable devices and injected failures
#[derive(Default)]
struct FakeFs {
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    nodes: BTreeMap<PathBuf, Node>,
    devices: Vec<(PathBuf, u64)>,
    exdev: HashSet<PathBuf>,
    broken: HashSet<PathBuf>,
    ops: Vec<String>,
}

impl FakeState {
    fn device_of(&self, path: &Path) -> u64 {
        self.devices
            .iter()
            .filter(|(root, _)| path.starts_with(root))
            .max_by_key(|(root, _)| root.components().count())
            .map(|(_, dev)| *dev)
            .unwrap_or(0)
    }

    fn subtree(&self, root: &Path) -> Vec<(PathBuf, Node)> {
        self.nodes
            .iter()
            .filter(|(p, _)| p.starts_with(root))
            .map(|(p, n)| (p.clone(), n.clone()))
            .collect()
    }

    fn not_found(path: &Path) -> FsError {
        FsError::NotFound {
            path: path.display().to_string(),
        }
    }
}

fn relocate(path: &Path, from: &Path, to: &Path) -> PathBuf {
    let suffix = path.strip_prefix(from).unwrap();
    if suffix.as_os_str().is_empty() {
        to.to_path_buf()
    } else {
        to.join(suffix)
    }
}

impl FakeFs {
    fn new() -> Self {
        Self::default()
    }

    fn dir(&self, path: &str) {
        let mut state = self.state.lock().unwrap();
        let mut current = PathBuf::new();
        for component in Path::new(path).components() {
            current.push(component);
            state.nodes.entry(current.clone()).or_insert(Node::Dir);
        }
    }

    fn file(&self, path: &str, content: &str) {
        if let Some(parent) = Path::new(path).parent() {
            self.dir(&parent.display().to_string());
        }
        self.state
            .lock()
            .unwrap()
            .nodes
            .insert(PathBuf::from(path), Node::File(content.to_string()));
    }

    fn device(&self, root: &str, id: u64) {
        self.state
            .lock()
            .unwrap()
            .devices
            .push((PathBuf::from(root), id));
    }

    fn rename_is_cross_device(&self, path: &str) {
        self.state.lock().unwrap().exdev.insert(PathBuf::from(path));
    }

    fn broken(&self, path: &str) {
        self.state.lock().unwrap().broken.insert(PathBuf::from(path));
    }

    fn node(&self, path: &str) -> Option<Node> {
        self.state.lock().unwrap().nodes.get(Path::new(path)).cloned()
    }

    fn ops(&self) -> Vec<String> {
        self.state.lock().unwrap().ops.clone()
    }
}

#[async_trait]
impl FileSystem for FakeFs {
    async fn stat(&self, path: &Path) -> FsResult<PathStat> {
        let state = self.state.lock().unwrap();
        match state.nodes.get(path) {
            Some(node) => Ok(PathStat {
                device_id: state.device_of(path),
                is_dir: *node == Node::Dir,
            }),
            None => Err(FakeState::not_found(path)),
        }
    }

    async fn list_entries(&self, path: &Path) -> FsResult<Vec<OsString>> {
        let state = self.state.lock().unwrap();
        if !state.nodes.contains_key(path) {
            return Err(FakeState::not_found(path));
        }
        Ok(state
            .nodes
            .keys()
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name().map(|n| n.to_os_string()))
            .collect())
    }

    async fn rename_entry(&self, from: &Path, to: &Path) -> FsResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.broken.contains(from) {
            return Err(FsError::Io {
                op: "rename",
                path: from.display().to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        if state.exdev.contains(from) {
            return Err(FsError::CrossDevice {
                from: from.display().to_string(),
                to: to.display().to_string(),
            });
        }
        let moved = state.subtree(from);
        if moved.is_empty() {
            return Err(FakeState::not_found(from));
        }
        for (path, node) in moved {
            state.nodes.remove(&path);
            state.nodes.insert(relocate(&path, from, to), node);
        }
        state.ops.push(format!("rename {}", from.display()));
        Ok(())
    }

    async fn copy_entry(&self, from: &Path, to: &Path) -> FsResult<()> {
        let mut state = self.state.lock().unwrap();
        let copied = state.subtree(from);
        if copied.is_empty() {
            return Err(FakeState::not_found(from));
        }
        for (path, node) in copied {
            state.nodes.insert(relocate(&path, from, to), node);
        }
        state.ops.push(format!("copy {}", from.display()));
        Ok(())
    }

    async fn remove_directory(&self, path: &Path) -> FsResult<()> {
        let mut state = self.state.lock().unwrap();
        let doomed: Vec<PathBuf> = state.subtree(path).into_iter().map(|(p, _)| p).collect();
        if doomed.is_empty() {
            return Err(FakeState::not_found(path));
        }
        for p in doomed {
            state.nodes.remove(&p);
        }
        state.ops.push(format!("remove {}", path.display()));
        Ok(())
    }

    async fn ensure_dir(&self, path: &Path) -> FsResult<()> {
        self.dir(&path.display().to_string());
        Ok(())
    }
}

fn engine(fs: FakeFs) -> PathTransferEngine<FakeFs> {
    PathTransferEngine::new(fs, 2)
}

#[tokio::test]
async fn test_missing_source_is_success_and_leaves_destination_alone() {
    let fs = FakeFs::new();
    let engine = engine(fs);

    let report = engine
        .transfer(Path::new("/old/downloads"), Path::new("/new/downloads"))
        .await
        .unwrap();

    assert!(report.source_missing);
    assert_eq!(report.moved(), 0);
    assert_eq!(engine.filesystem().node("/new/downloads"), None);
    assert!(engine.filesystem().ops().is_empty());
}

#[tokio::test]
async fn test_same_device_renames_every_entry() {
    let fs = FakeFs::new();
    fs.file("/disk/old/a.zip", "a");
    fs.file("/disk/old/sub/b.zip", "b");
    fs.dir("/disk/new");
    let engine = engine(fs);

    let report = engine
        .transfer(Path::new("/disk/old"), Path::new("/disk/new"))
        .await
        .unwrap();

    assert_eq!(report.renamed, 2);
    assert_eq!(report.copied, 0);
    let fs = engine.filesystem();
    assert_eq!(fs.node("/disk/new/a.zip"), Some(Node::File("a".into())));
    assert_eq!(fs.node("/disk/new/sub/b.zip"), Some(Node::File("b".into())));
    assert_eq!(fs.node("/disk/old"), None);
    assert!(fs.ops().iter().all(|op| !op.starts_with("copy")));
}

#[tokio::test]
async fn test_different_devices_copy_then_remove_source() {
    let fs = FakeFs::new();
    fs.device("/hdd", 1);
    fs.device("/ssd", 2);
    fs.file("/hdd/old/a.zip", "a");
    fs.file("/hdd/old/b.zip", "b");
    fs.dir("/ssd/new");
    let engine = engine(fs);

    let report = engine
        .transfer(Path::new("/hdd/old"), Path::new("/ssd/new"))
        .await
        .unwrap();

    assert_eq!(report.copied, 2);
    assert_eq!(report.renamed, 0);
    let fs = engine.filesystem();
    assert_eq!(fs.node("/ssd/new/a.zip"), Some(Node::File("a".into())));
    assert_eq!(fs.node("/ssd/new/b.zip"), Some(Node::File("b".into())));
    assert_eq!(fs.node("/hdd/old"), None);
    assert_eq!(fs.ops().last().map(String::as_str), Some("remove /hdd/old"));
}

#[tokio::test]
async fn test_cross_device_rename_falls_back_to_copy_for_that_entry() {
    let fs = FakeFs::new();
    fs.file("/disk/old/local.zip", "l");
    fs.file("/disk/old/mounted/remote.zip", "r");
    fs.dir("/disk/new");
    fs.rename_is_cross_device("/disk/old/mounted");
    let engine = engine(fs);

    let report = engine
        .transfer(Path::new("/disk/old"), Path::new("/disk/new"))
        .await
        .unwrap();

    assert_eq!(report.renamed, 1);
    assert_eq!(report.copied, 1);
    let fs = engine.filesystem();
    assert_eq!(
        fs.node("/disk/new/mounted/remote.zip"),
        Some(Node::File("r".into()))
    );
    assert_eq!(fs.node("/disk/old"), None);
}

#[tokio::test]
async fn test_other_errors_propagate_and_keep_source() {
    let fs = FakeFs::new();
    fs.file("/disk/old/locked.zip", "x");
    fs.dir("/disk/new");
    fs.broken("/disk/old/locked.zip");
    let engine = engine(fs);

    let err = engine
        .transfer(Path::new("/disk/old"), Path::new("/disk/new"))
        .await
        .unwrap_err();

    assert!(matches!(err, FsError::Io { op: "rename", .. }));
    let fs = engine.filesystem();
    assert!(fs.node("/disk/old/locked.zip").is_some());
    assert!(fs.ops().iter().all(|op| !op.starts_with("remove")));
}

#[tokio::test]
async fn test_missing_destination_is_created() {
    let fs = FakeFs::new();
    fs.file("/disk/old/a.zip", "a");
    let engine = engine(fs);

    engine
        .transfer(Path::new("/disk/old"), Path::new("/disk/fresh/dir"))
        .await
        .unwrap();

    assert_eq!(
        engine.filesystem().node("/disk/fresh/dir/a.zip"),
        Some(Node::File("a".into()))
    );
}

#[tokio::test]
async fn test_empty_source_is_removed() {
    let fs = FakeFs::new();
    fs.dir("/disk/old");
    fs.dir("/disk/new");
    let engine = engine(fs);

    let report = engine
        .transfer(Path::new("/disk/old"), Path::new("/disk/new"))
        .await
        .unwrap();

    assert_eq!(report.moved(), 0);
    assert!(!report.source_missing);
    assert_eq!(engine.filesystem().node("/disk/old"), None);
}

/// [`FakeFs`] whose entry operations stay pending for a few polls, counting
/// how many are in flight at once
struct GaugedFs {
    inner: FakeFs,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    in_flight_at_remove: Mutex<Option<usize>>,
}

impl GaugedFs {
    fn new(inner: FakeFs) -> Self {
        Self {
            inner,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            in_flight_at_remove: Mutex::new(None),
        }
    }

    async fn hold<T>(&self, op: impl Future<Output = T>) -> T {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        let result = op.await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileSystem for GaugedFs {
    async fn stat(&self, path: &Path) -> FsResult<PathStat> {
        self.inner.stat(path).await
    }

    async fn list_entries(&self, path: &Path) -> FsResult<Vec<OsString>> {
        self.inner.list_entries(path).await
    }

    async fn rename_entry(&self, from: &Path, to: &Path) -> FsResult<()> {
        self.hold(self.inner.rename_entry(from, to)).await
    }

    async fn copy_entry(&self, from: &Path, to: &Path) -> FsResult<()> {
        self.hold(self.inner.copy_entry(from, to)).await
    }

    async fn remove_directory(&self, path: &Path) -> FsResult<()> {
        *self.in_flight_at_remove.lock().unwrap() = Some(self.in_flight.load(Ordering::SeqCst));
        self.inner.remove_directory(path).await
    }

    async fn ensure_dir(&self, path: &Path) -> FsResult<()> {
        self.inner.ensure_dir(path).await
    }
}

fn many_entries(count: usize) -> FakeFs {
    let fs = FakeFs::new();
    for i in 0..count {
        fs.file(&format!("/disk/old/{i:02}.zip"), "x");
    }
    fs.dir("/disk/new");
    fs
}

#[tokio::test]
async fn test_entry_operations_respect_concurrency_limit() {
    let engine = PathTransferEngine::new(GaugedFs::new(many_entries(7)), 3);

    let report = engine
        .transfer(Path::new("/disk/old"), Path::new("/disk/new"))
        .await
        .unwrap();

    assert_eq!(report.renamed, 7);
    let fs = engine.filesystem();
    assert!(fs.peak() <= 3, "peak in flight was {}", fs.peak());
    assert!(fs.peak() > 1, "entries never overlapped");
    assert_eq!(*fs.in_flight_at_remove.lock().unwrap(), Some(0));
    assert_eq!(fs.inner.node("/disk/old"), None);
}

#[tokio::test]
async fn test_concurrency_of_one_is_sequential() {
    let engine = PathTransferEngine::new(GaugedFs::new(many_entries(4)), 1);

    engine
        .transfer(Path::new("/disk/old"), Path::new("/disk/new"))
        .await
        .unwrap();

    assert_eq!(engine.filesystem().peak(), 1);
}

#[tokio::test]
async fn test_failed_entry_lets_the_others_finish() {
    let fs = FakeFs::new();
    fs.file("/disk/old/a-locked.zip", "locked");
    for name in ["b.zip", "c.zip", "d.zip", "e.zip"] {
        fs.file(&format!("/disk/old/{name}"), name);
    }
    fs.dir("/disk/new");
    fs.broken("/disk/old/a-locked.zip");
    let engine = engine(fs);

    let err = engine
        .transfer(Path::new("/disk/old"), Path::new("/disk/new"))
        .await
        .unwrap_err();

    assert!(matches!(err, FsError::Io { op: "rename", .. }));
    let fs = engine.filesystem();
    for name in ["b.zip", "c.zip", "d.zip", "e.zip"] {
        assert_eq!(
            fs.node(&format!("/disk/new/{name}")),
            Some(Node::File(name.into()))
        );
    }
    assert!(fs.node("/disk/old/a-locked.zip").is_some());
    assert!(fs.ops().iter().all(|op| !op.starts_with("remove")));
}
