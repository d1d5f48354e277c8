//! Filesystem-backed driver. Roots every logical path under a host
//! directory; listing metadata comes from the [`Perm`] policy rather than
//! the host filesystem.

use std::io::{self, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncRead, AsyncSeekExt, AsyncWriteExt};

use super::{Driver, DriverFactory, FileInfo, FileStream, Perm};

pub struct FileDriver {
    root: PathBuf,
    perm: Arc<dyn Perm>,
}

impl FileDriver {
    pub fn new(root: impl Into<PathBuf>, perm: Arc<dyn Perm>) -> Self {
        FileDriver {
            root: root.into(),
            perm,
        }
    }

    fn real_path(&self, path: &str) -> PathBuf {
        let mut real = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            real.push(segment);
        }
        real
    }

    fn entry_info(
        &self,
        name: &str,
        logical: &str,
        meta: &std::fs::Metadata,
    ) -> io::Result<FileInfo> {
        let mode = if meta.is_dir() {
            0o755
        } else {
            self.perm.mode_of(logical)?
        };
        let mtime = meta
            .modified()
            .unwrap_or(SystemTime::UNIX_EPOCH);
        Ok(FileInfo {
            name: name.to_string(),
            size: meta.len(),
            mtime: DateTime::<Utc>::from(mtime),
            mode,
            is_dir: meta.is_dir(),
            owner: self.perm.owner_of(logical)?,
            group: self.perm.group_of(logical)?,
        })
    }
}

#[async_trait]
impl Driver for FileDriver {
    async fn stat(&mut self, path: &str) -> io::Result<FileInfo> {
        let meta = tokio::fs::symlink_metadata(self.real_path(path)).await?;
        self.entry_info(crate::path::base_name(path), path, &meta)
    }

    async fn change_dir(&mut self, path: &str) -> io::Result<()> {
        let meta = tokio::fs::symlink_metadata(self.real_path(path)).await?;
        if meta.is_dir() {
            Ok(())
        } else {
            Err(io::Error::new(io::ErrorKind::Other, "not a directory"))
        }
    }

    async fn list_dir(
        &mut self,
        path: &str,
        visit: &mut (dyn for<'a> FnMut(&'a FileInfo) -> io::Result<()> + Send),
    ) -> io::Result<()> {
        let mut entries = tokio::fs::read_dir(self.real_path(path)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let logical = format!("{}/{}", path.trim_end_matches('/'), name);
            let info = self.entry_info(&name, &logical, &meta)?;
            visit(&info)?;
        }
        Ok(())
    }

    async fn make_dir(&mut self, path: &str) -> io::Result<()> {
        tokio::fs::create_dir_all(self.real_path(path)).await
    }

    async fn delete_dir(&mut self, path: &str) -> io::Result<()> {
        let real = self.real_path(path);
        let meta = tokio::fs::symlink_metadata(&real).await?;
        if meta.is_dir() {
            tokio::fs::remove_dir(real).await
        } else {
            Err(io::Error::new(io::ErrorKind::Other, "not a directory"))
        }
    }

    async fn delete_file(&mut self, path: &str) -> io::Result<()> {
        let real = self.real_path(path);
        let meta = tokio::fs::symlink_metadata(&real).await?;
        if meta.is_dir() {
            Err(io::Error::new(io::ErrorKind::Other, "not a file"))
        } else {
            tokio::fs::remove_file(real).await
        }
    }

    async fn rename(&mut self, from: &str, to: &str) -> io::Result<()> {
        tokio::fs::rename(self.real_path(from), self.real_path(to)).await
    }

    async fn get_file(&mut self, path: &str, offset: u64) -> io::Result<(u64, FileStream)> {
        let mut file = File::open(self.real_path(path)).await?;
        let size = file.metadata().await?.len();
        if offset > 0 {
            file.seek(SeekFrom::Start(offset)).await?;
        }
        Ok((size, Box::new(file)))
    }

    async fn put_file(
        &mut self,
        path: &str,
        offset: u64,
        data: &mut (dyn AsyncRead + Send + Unpin),
        append: bool,
    ) -> io::Result<u64> {
        let real = self.real_path(path);
        let existing = match tokio::fs::symlink_metadata(&real).await {
            Ok(meta) if meta.is_dir() => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    "a directory has the same name",
                ));
            }
            Ok(_) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e),
        };

        let mut file = if offset > 0 {
            if append && !existing {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
            }
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .open(&real)
                .await?;
            file.seek(SeekFrom::Start(offset)).await?;
            file
        } else if append && existing {
            OpenOptions::new().append(true).open(&real).await?
        } else {
            // Appending to a file that does not exist yet degrades to
            // plain create-and-write.
            File::create(&real).await?
        };

        let written = tokio::io::copy(data, &mut file).await?;
        file.flush().await?;
        Ok(written)
    }
}

pub struct FileDriverFactory {
    pub root_path: PathBuf,
    pub perm: Arc<dyn Perm>,
}

impl FileDriverFactory {
    pub fn new(root_path: impl Into<PathBuf>, perm: Arc<dyn Perm>) -> Self {
        FileDriverFactory {
            root_path: root_path.into(),
            perm,
        }
    }
}

impl DriverFactory for FileDriverFactory {
    fn new_driver(&self) -> io::Result<Box<dyn Driver>> {
        Ok(Box::new(FileDriver::new(
            self.root_path.clone(),
            Arc::clone(&self.perm),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_driver::SimplePerm;
    use tokio::io::AsyncReadExt;

    fn driver(root: &std::path::Path) -> FileDriver {
        FileDriver::new(root, Arc::new(SimplePerm::new("owner", "group")))
    }

    async fn read_back(driver: &mut FileDriver, path: &str) -> Vec<u8> {
        let (_, mut stream) = driver.get_file(path, 0).await.unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        out
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = driver(dir.path());

        let mut data = &b"hello"[..];
        let n = d.put_file("/hello.txt", 0, &mut data, false).await.unwrap();
        assert_eq!(n, 5);
        assert_eq!(read_back(&mut d, "/hello.txt").await, b"hello");

        let info = d.stat("/hello.txt").await.unwrap();
        assert_eq!(info.name, "hello.txt");
        assert_eq!(info.size, 5);
        assert!(!info.is_dir);
        assert_eq!(info.mode, 0o644);
    }

    #[tokio::test]
    async fn append_concatenates() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = driver(dir.path());

        let mut first = &b"abc"[..];
        d.put_file("/f", 0, &mut first, true).await.unwrap();
        let mut second = &b"def"[..];
        d.put_file("/f", 0, &mut second, true).await.unwrap();
        assert_eq!(read_back(&mut d, "/f").await, b"abcdef");
    }

    #[tokio::test]
    async fn store_truncates_without_append() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = driver(dir.path());

        let mut long = &b"a long line"[..];
        d.put_file("/f", 0, &mut long, false).await.unwrap();
        let mut short = &b"hi"[..];
        d.put_file("/f", 0, &mut short, false).await.unwrap();
        assert_eq!(read_back(&mut d, "/f").await, b"hi");
    }

    #[tokio::test]
    async fn offset_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = driver(dir.path());

        let mut base = &b"world"[..];
        d.put_file("/f", 0, &mut base, false).await.unwrap();
        let mut patch = &b"ZZ"[..];
        d.put_file("/f", 2, &mut patch, false).await.unwrap();
        assert_eq!(read_back(&mut d, "/f").await, b"woZZd");
    }

    #[tokio::test]
    async fn offset_append_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = driver(dir.path());

        let mut data = &b"x"[..];
        let err = d.put_file("/missing", 3, &mut data, true).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn get_file_honors_offset() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = driver(dir.path());

        let mut data = &b"0123456789"[..];
        d.put_file("/f", 0, &mut data, false).await.unwrap();

        let (size, mut stream) = d.get_file("/f", 6).await.unwrap();
        assert_eq!(size, 10);
        let mut tail = Vec::new();
        stream.read_to_end(&mut tail).await.unwrap();
        assert_eq!(tail, b"6789");
    }

    #[tokio::test]
    async fn list_dir_visits_immediate_children() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = driver(dir.path());

        d.make_dir("/sub").await.unwrap();
        let mut nested = &b"deep"[..];
        d.put_file("/sub/inner.txt", 0, &mut nested, false).await.unwrap();
        let mut data = &b"top"[..];
        d.put_file("/top.txt", 0, &mut data, false).await.unwrap();

        let mut names = Vec::new();
        d.list_dir("/", &mut |info| {
            names.push(info.name.clone());
            Ok(())
        })
        .await
        .unwrap();
        names.sort();
        assert_eq!(names, ["sub", "top.txt"]);
    }

    #[tokio::test]
    async fn delete_checks_entry_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = driver(dir.path());

        d.make_dir("/sub").await.unwrap();
        let mut data = &b"x"[..];
        d.put_file("/f", 0, &mut data, false).await.unwrap();

        assert!(d.delete_file("/sub").await.is_err());
        assert!(d.delete_dir("/f").await.is_err());
        d.delete_file("/f").await.unwrap();
        d.delete_dir("/sub").await.unwrap();
        assert!(d.stat("/f").await.is_err());
        assert!(d.stat("/sub").await.is_err());
    }

    #[tokio::test]
    async fn rename_moves_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = driver(dir.path());

        let mut data = &b"x"[..];
        d.put_file("/a", 0, &mut data, false).await.unwrap();
        d.rename("/a", "/b").await.unwrap();
        assert!(d.stat("/a").await.is_err());
        assert_eq!(d.stat("/b").await.unwrap().name, "b");
    }

    #[tokio::test]
    async fn directories_report_dir_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut d = driver(dir.path());

        d.make_dir("/sub").await.unwrap();
        let info = d.stat("/sub").await.unwrap();
        assert!(info.is_dir);
        assert_eq!(info.mode, 0o755);
    }
}
