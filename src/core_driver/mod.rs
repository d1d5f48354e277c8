//! Backend contracts.
//!
//! A [`Driver`] speaks to the chosen persistence layer. The server creates
//! one driver per control connection through a [`DriverFactory`] and
//! delegates every namespace operation to it. All paths handed to a driver
//! are canonical absolute logical paths rooted at `/` (see
//! [`path`](crate::path)).

use std::io;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncRead;

pub mod file;
pub mod sink;

/// Metadata for one entry in the logical namespace. Produced by drivers,
/// treated as read-only by the core.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub mtime: DateTime<Utc>,
    /// Permission bits, nine low bits significant.
    pub mode: u32,
    pub is_dir: bool,
    pub owner: String,
    pub group: String,
}

/// Byte stream returned by [`Driver::get_file`], already positioned at the
/// requested offset. The caller drives it to completion and drops it.
pub type FileStream = Box<dyn AsyncRead + Send + Unpin>;

/// Storage backend for one session.
///
/// "Not found" and "denied" conditions are ordinary `io::Error`s; the
/// session maps any driver error to a 550 reply carrying the error text
/// and carries on.
#[async_trait]
pub trait Driver: Send {
    /// One-time binding to the owning session.
    fn init(&mut self, _session_id: u64) {}

    async fn stat(&mut self, path: &str) -> io::Result<FileInfo>;

    /// Succeeds iff `path` names a directory the user may enter.
    async fn change_dir(&mut self, path: &str) -> io::Result<()>;

    /// Invokes `visit` for each immediate child of `path`.
    async fn list_dir(
        &mut self,
        path: &str,
        visit: &mut (dyn for<'a> FnMut(&'a FileInfo) -> io::Result<()> + Send),
    ) -> io::Result<()>;

    async fn make_dir(&mut self, path: &str) -> io::Result<()>;

    async fn delete_dir(&mut self, path: &str) -> io::Result<()>;

    async fn delete_file(&mut self, path: &str) -> io::Result<()>;

    async fn rename(&mut self, from: &str, to: &str) -> io::Result<()>;

    /// Returns the file's total size and a stream yielding its bytes
    /// starting at `offset`.
    async fn get_file(&mut self, path: &str, offset: u64) -> io::Result<(u64, FileStream)>;

    /// Writes `data` to `path`, returning the byte count.
    ///
    /// * `append=true, offset=0`: append to the end; create when missing.
    /// * `append=false, offset=0`: truncate or create, write from 0.
    /// * `offset>0`: seek and overwrite from there; with `append=true` the
    ///   file must already exist.
    async fn put_file(
        &mut self,
        path: &str,
        offset: u64,
        data: &mut (dyn AsyncRead + Send + Unpin),
        append: bool,
    ) -> io::Result<u64>;

    /// Invoked on client ABOR. Drivers that cannot cancel in-flight I/O
    /// just return Ok.
    async fn abort(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Invoked once when the session ends.
    async fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Creates a fresh [`Driver`] for each client that connects.
pub trait DriverFactory: Send + Sync {
    fn new_driver(&self) -> io::Result<Box<dyn Driver>>;
}

/// Resolves listing metadata for a logical path.
pub trait Perm: Send + Sync {
    fn owner_of(&self, path: &str) -> io::Result<String>;
    fn group_of(&self, path: &str) -> io::Result<String>;
    fn mode_of(&self, path: &str) -> io::Result<u32>;
}

/// Fixed owner and group, mode `0644`. Drivers report `0755` for
/// directories on their own.
#[derive(Debug, Clone)]
pub struct SimplePerm {
    owner: String,
    group: String,
}

impl SimplePerm {
    pub fn new(owner: impl Into<String>, group: impl Into<String>) -> Self {
        SimplePerm {
            owner: owner.into(),
            group: group.into(),
        }
    }
}

impl Perm for SimplePerm {
    fn owner_of(&self, _path: &str) -> io::Result<String> {
        Ok(self.owner.clone())
    }

    fn group_of(&self, _path: &str) -> io::Result<String> {
        Ok(self.group.clone())
    }

    fn mode_of(&self, _path: &str) -> io::Result<u32> {
        Ok(0o644)
    }
}
