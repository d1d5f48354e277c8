use thiserror::Error;

/// Errors surfaced by [`Server`](crate::Server) lifecycle calls.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Sentinel returned by `listen_and_serve` / `serve` once a graceful
    /// `shutdown` has been initiated. Not a failure.
    #[error("ftp: server closed")]
    Closed,

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn is_closed(&self) -> bool {
        matches!(self, ServerError::Closed)
    }
}
