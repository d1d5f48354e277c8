//! Virtual single-file driver.
//!
//! Exposes exactly one writable file named `output` and forwards every
//! upload to a [`Proxy`]. Retrieval, listing and namespace mutation are
//! not part of this backend; a client gets "not implemented" for all of
//! them.

use std::io;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncRead;

use super::{Driver, DriverFactory, FileInfo, FileStream};

/// Name of the single virtual file.
pub const SINK_FILE_NAME: &str = "output";

/// Receives the bytes uploaded to the virtual file.
#[async_trait]
pub trait Proxy: Send {
    /// Copies everything from `data`, returning the byte count.
    async fn proxy_from(
        &mut self,
        data: &mut (dyn AsyncRead + Send + Unpin),
        offset: u64,
    ) -> io::Result<u64>;

    /// Concludes that there will be no more writes.
    async fn close(&mut self) -> io::Result<()>;
}

pub struct SinkDriver {
    proxy: Box<dyn Proxy>,
    // Running count of proxied bytes. Reported by stat without any
    // correctness claim; concurrent sessions each keep their own count.
    size: u64,
}

impl SinkDriver {
    pub fn new(proxy: Box<dyn Proxy>) -> Self {
        SinkDriver { proxy, size: 0 }
    }
}

fn not_implemented() -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, "not implemented")
}

#[async_trait]
impl Driver for SinkDriver {
    async fn stat(&mut self, _path: &str) -> io::Result<FileInfo> {
        Ok(FileInfo {
            name: SINK_FILE_NAME.to_string(),
            size: self.size,
            mtime: DateTime::<Utc>::UNIX_EPOCH,
            mode: 0o666,
            is_dir: false,
            owner: "owner".to_string(),
            group: "group".to_string(),
        })
    }

    async fn change_dir(&mut self, _path: &str) -> io::Result<()> {
        Err(not_implemented())
    }

    async fn list_dir(
        &mut self,
        _path: &str,
        _visit: &mut (dyn for<'a> FnMut(&'a FileInfo) -> io::Result<()> + Send),
    ) -> io::Result<()> {
        Err(not_implemented())
    }

    async fn make_dir(&mut self, _path: &str) -> io::Result<()> {
        Err(not_implemented())
    }

    async fn delete_dir(&mut self, _path: &str) -> io::Result<()> {
        Err(not_implemented())
    }

    async fn delete_file(&mut self, _path: &str) -> io::Result<()> {
        Err(not_implemented())
    }

    async fn rename(&mut self, _from: &str, _to: &str) -> io::Result<()> {
        Err(not_implemented())
    }

    async fn get_file(&mut self, _path: &str, _offset: u64) -> io::Result<(u64, FileStream)> {
        Err(not_implemented())
    }

    async fn put_file(
        &mut self,
        path: &str,
        offset: u64,
        data: &mut (dyn AsyncRead + Send + Unpin),
        _append: bool,
    ) -> io::Result<u64> {
        if path != format!("/{}", SINK_FILE_NAME) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "unexpected file name",
            ));
        }
        let written = self.proxy.proxy_from(data, offset).await?;
        self.size += written;
        Ok(written)
    }

    async fn abort(&mut self) -> io::Result<()> {
        self.proxy.close().await
    }
}

pub struct SinkDriverFactory {
    make_proxy: Box<dyn Fn() -> Box<dyn Proxy> + Send + Sync>,
}

impl SinkDriverFactory {
    pub fn new(make_proxy: impl Fn() -> Box<dyn Proxy> + Send + Sync + 'static) -> Self {
        SinkDriverFactory {
            make_proxy: Box::new(make_proxy),
        }
    }
}

impl DriverFactory for SinkDriverFactory {
    fn new_driver(&self) -> io::Result<Box<dyn Driver>> {
        Ok(Box::new(SinkDriver::new((self.make_proxy)())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::AsyncReadExt;

    struct CaptureProxy {
        bytes: Arc<Mutex<Vec<u8>>>,
        closed: Arc<Mutex<bool>>,
    }

    #[async_trait]
    impl Proxy for CaptureProxy {
        async fn proxy_from(
            &mut self,
            data: &mut (dyn AsyncRead + Send + Unpin),
            _offset: u64,
        ) -> io::Result<u64> {
            let mut buf = Vec::new();
            data.read_to_end(&mut buf).await?;
            let n = buf.len() as u64;
            self.bytes.lock().unwrap().extend_from_slice(&buf);
            Ok(n)
        }

        async fn close(&mut self) -> io::Result<()> {
            *self.closed.lock().unwrap() = true;
            Ok(())
        }
    }

    #[tokio::test]
    async fn uploads_reach_the_proxy() {
        let bytes = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(Mutex::new(false));
        let mut d = SinkDriver::new(Box::new(CaptureProxy {
            bytes: Arc::clone(&bytes),
            closed: Arc::clone(&closed),
        }));

        let mut data = &b"streamed"[..];
        let n = d.put_file("/output", 0, &mut data, false).await.unwrap();
        assert_eq!(n, 8);
        assert_eq!(&*bytes.lock().unwrap(), b"streamed");
        assert_eq!(d.stat("/output").await.unwrap().size, 8);
    }

    #[tokio::test]
    async fn only_the_virtual_file_is_writable() {
        let mut d = SinkDriver::new(Box::new(CaptureProxy {
            bytes: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(Mutex::new(false)),
        }));
        let mut data = &b"x"[..];
        assert!(d.put_file("/other", 0, &mut data, false).await.is_err());
        assert!(d.get_file("/output", 0).await.is_err());
        assert!(d.change_dir("/").await.is_err());
    }

    #[tokio::test]
    async fn abort_closes_the_proxy() {
        let closed = Arc::new(Mutex::new(false));
        let mut d = SinkDriver::new(Box::new(CaptureProxy {
            bytes: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::clone(&closed),
        }));
        d.abort().await.unwrap();
        assert!(*closed.lock().unwrap());
    }
}
