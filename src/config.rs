use std::net::IpAddr;
use std::sync::Arc;

use crate::core_auth::Auth;
use crate::core_driver::DriverFactory;
use crate::core_log::{Logger, StdLogger};

/// Server configuration, supplied by the embedding application.
///
/// `factory` and `auth` are required; everything else has a usable default
/// filled in by [`Server::new`](crate::Server::new).
pub struct ServerOpts {
    /// Name shown in the 220 welcome banner.
    pub name: String,
    /// Interface the control listener binds to.
    pub hostname: String,
    /// Control port.
    pub port: u16,
    /// Produces one driver per session.
    pub factory: Box<dyn DriverFactory>,
    /// Validates USER/PASS pairs.
    pub auth: Arc<dyn Auth>,
    /// Sink for commands, replies and free-form session logs.
    pub logger: Arc<dyn Logger>,
    /// Overrides the host address encoded in PASV replies, for servers
    /// behind NAT.
    pub public_ip: Option<IpAddr>,
    /// Inclusive port range for passive data listeners. Ephemeral ports
    /// when unset.
    pub passive_ports: Option<(u16, u16)>,
}

impl ServerOpts {
    pub fn new(factory: Box<dyn DriverFactory>, auth: Arc<dyn Auth>) -> Self {
        ServerOpts {
            name: String::new(),
            hostname: String::new(),
            port: 0,
            factory,
            auth,
            logger: Arc::new(StdLogger),
            public_ip: None,
            passive_ports: None,
        }
    }
}
