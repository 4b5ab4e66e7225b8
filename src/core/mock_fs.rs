use crate::domain::model::FileMetadata;
use crate::domain::ports::{DirEntry, EntryKind, FileSystem};
use std::collections::{BTreeMap, HashSet};
use std::io::{Cursor, Error, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
    Symlink,
}

#[derive(Default)]
struct State {
    nodes: BTreeMap<PathBuf, Node>,
    denied: HashSet<PathBuf>,
    unreadable: HashSet<PathBuf>,
    undeletable: HashSet<PathBuf>,
    written: BTreeMap<PathBuf, Vec<u8>>,
}

/// In-memory tree for pipeline tests.
#[derive(Clone, Default)]
pub(crate) struct MockFileSystem {
    state: Arc<Mutex<State>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.dir("/data");
        fs
    }

    pub fn dir(&self, path: &str) -> &Self {
        let mut state = self.state.lock().unwrap();
        let mut current = PathBuf::new();
        for component in Path::new(path).components() {
            current.push(component);
            state.nodes.entry(current.clone()).or_insert(Node::Dir);
        }
        drop(state);
        self
    }

    pub fn file(&self, path: &str, content: &[u8]) -> &Self {
        if let Some(parent) = Path::new(path).parent() {
            self.dir(&parent.to_string_lossy());
        }
        let mut state = self.state.lock().unwrap();
        state
            .nodes
            .insert(PathBuf::from(path), Node::File(content.to_vec()));
        drop(state);
        self
    }

    pub fn symlink(&self, path: &str) -> &Self {
        let mut state = self.state.lock().unwrap();
        state.nodes.insert(PathBuf::from(path), Node::Symlink);
        drop(state);
        self
    }

    pub fn deny(&self, path: &str) -> &Self {
        self.state.lock().unwrap().denied.insert(PathBuf::from(path));
        self
    }

    pub fn unreadable(&self, path: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .unreadable
            .insert(PathBuf::from(path));
        self
    }

    pub fn undeletable(&self, path: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .undeletable
            .insert(PathBuf::from(path));
        self
    }

    pub fn exists(&self, path: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .nodes
            .contains_key(Path::new(path))
    }

    pub fn written(&self, path: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .written
            .get(Path::new(path))
            .cloned()
    }
}

fn not_found(path: &Path) -> Error {
    Error::new(ErrorKind::NotFound, format!("{} not found", path.display()))
}

impl FileSystem for MockFileSystem {
    fn read_dir(&self, path: &Path) -> std::io::Result<Vec<DirEntry>> {
        let state = self.state.lock().unwrap();
        if state.denied.contains(path) {
            return Err(Error::new(ErrorKind::PermissionDenied, "permission denied"));
        }
        if state.unreadable.contains(path) {
            return Err(Error::new(ErrorKind::Other, "input/output error"));
        }
        match state.nodes.get(path) {
            Some(Node::Dir) => {}
            Some(_) => return Err(Error::new(ErrorKind::Other, "not a directory")),
            None => return Err(not_found(path)),
        }

        // 反序回傳，確認呼叫端自行排序
        let mut entries: Vec<DirEntry> = state
            .nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, node)| DirEntry {
                path: p.clone(),
                name: p
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                kind: match node {
                    Node::File(_) => EntryKind::File,
                    Node::Dir => EntryKind::Directory,
                    Node::Symlink => EntryKind::Symlink,
                },
            })
            .collect();
        entries.reverse();
        Ok(entries)
    }

    fn entry_kind(&self, path: &Path) -> std::io::Result<EntryKind> {
        let state = self.state.lock().unwrap();
        match state.nodes.get(path) {
            Some(Node::File(_)) => Ok(EntryKind::File),
            Some(Node::Dir) => Ok(EntryKind::Directory),
            Some(Node::Symlink) => Ok(EntryKind::Symlink),
            None => Err(not_found(path)),
        }
    }

    fn metadata(&self, path: &Path) -> std::io::Result<FileMetadata> {
        let state = self.state.lock().unwrap();
        match state.nodes.get(path) {
            Some(Node::File(content)) => Ok(FileMetadata::new(
                content.len() as u64,
                SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
                None,
            )),
            Some(_) => Ok(FileMetadata::new(0, SystemTime::UNIX_EPOCH, None)),
            None => Err(not_found(path)),
        }
    }

    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + Send>> {
        let state = self.state.lock().unwrap();
        if state.unreadable.contains(path) {
            return Err(Error::new(ErrorKind::PermissionDenied, "permission denied"));
        }
        match state.nodes.get(path) {
            Some(Node::File(content)) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(_) => Err(Error::new(ErrorKind::Other, "not a file")),
            None => Err(not_found(path)),
        }
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.undeletable.contains(path) {
            return Err(Error::new(ErrorKind::PermissionDenied, "permission denied"));
        }
        match state.nodes.remove(path) {
            Some(_) => Ok(()),
            None => Err(not_found(path)),
        }
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut state = self.state.lock().unwrap();
        let blocked = path
            .ancestors()
            .skip(1)
            .any(|p| matches!(state.nodes.get(p), Some(Node::File(_))));
        if blocked {
            return Err(Error::new(ErrorKind::AlreadyExists, "file exists"));
        }
        state.written.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }
}
