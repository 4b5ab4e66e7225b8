use crate::domain::model::FileMetadata;
use crate::domain::ports::{DirEntry, EntryKind, FileSystem};
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn kind_of(file_type: fs::FileType) -> EntryKind {
    if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else {
        EntryKind::Other
    }
}

/// Drops entries the OS failed to return so the rest of the listing survives.
fn readable_entries<T>(
    dir: &Path,
    entries: impl Iterator<Item = std::io::Result<T>>,
) -> Vec<T> {
    entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .collect()
}

impl FileSystem for LocalFileSystem {
    fn read_dir(&self, path: &Path) -> std::io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in readable_entries(path, fs::read_dir(path)?) {
            // file_type() 不跟隨 symlink
            let kind = match entry.file_type() {
                Ok(file_type) => kind_of(file_type),
                Err(e) => {
                    tracing::debug!("Cannot stat {}: {}", entry.path().display(), e);
                    EntryKind::Other
                }
            };
            entries.push(DirEntry {
                path: entry.path(),
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        Ok(entries)
    }

    fn entry_kind(&self, path: &Path) -> std::io::Result<EntryKind> {
        Ok(kind_of(fs::metadata(path)?.file_type()))
    }

    fn metadata(&self, path: &Path) -> std::io::Result<FileMetadata> {
        FileMetadata::from_std(&fs::metadata(path)?)
    }

    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(BufReader::new(fs::File::open(path)?)))
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_dir_reports_kinds() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), b"hello").unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let fs_impl = LocalFileSystem::new();
        let mut entries = fs_impl.read_dir(temp_dir.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].name, "sub");
        assert_eq!(entries[1].kind, EntryKind::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_not_followed_in_listing() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target.txt");
        fs::write(&target, b"data").unwrap();
        std::os::unix::fs::symlink(&target, temp_dir.path().join("link.txt")).unwrap();

        let fs_impl = LocalFileSystem::new();
        let entries = fs_impl.read_dir(temp_dir.path()).unwrap();
        let link = entries.iter().find(|e| e.name == "link.txt").unwrap();

        assert_eq!(link.kind, EntryKind::Symlink);
        assert_eq!(
            fs_impl.entry_kind(&temp_dir.path().join("link.txt")).unwrap(),
            EntryKind::File
        );
    }

    #[test]
    fn test_bad_entry_does_not_drop_its_siblings() {
        let listing = vec![
            Ok("a.txt"),
            Err(std::io::Error::new(std::io::ErrorKind::Other, "stale handle")),
            Ok("b.txt"),
        ];

        let entries = readable_entries(Path::new("/data"), listing.into_iter());

        assert_eq!(entries, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports/nested/report.json");

        let fs_impl = LocalFileSystem::new();
        fs_impl.write_file(&path, b"{}").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"{}");
        assert_eq!(fs_impl.metadata(&path).unwrap().size, 2);
    }
}
