//! Embeddable asynchronous FTP server.
//!
//! The host application supplies a [`DriverFactory`] for the storage
//! backend and an [`Auth`] implementation, wires both into [`ServerOpts`],
//! and runs a [`Server`]. One driver instance is created per control
//! connection; file transfers run over separately negotiated data
//! connections in passive mode.

pub mod config;
pub mod constants;
pub mod core_auth;
pub mod core_driver;
pub mod core_ftpcommand;
pub mod core_log;
pub mod core_network;
pub mod error;
pub mod helpers;
pub mod path;
pub mod server;
pub mod session;

pub use config::ServerOpts;
pub use core_auth::{Auth, NoAuth, SimpleAuth};
pub use core_driver::file::{FileDriver, FileDriverFactory};
pub use core_driver::sink::{Proxy, SinkDriver, SinkDriverFactory};
pub use core_driver::{Driver, DriverFactory, FileInfo, FileStream, Perm, SimplePerm};
pub use core_log::{DiscardLogger, Logger, StdLogger};
pub use error::ServerError;
pub use server::Server;
pub use session::Session;
