/// Control port used when `ServerOpts.port` is left at zero.
pub const DEFAULT_PORT: u16 = 21;

/// Interface bound when `ServerOpts.hostname` is left empty.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0";

/// How long a pending passive listener waits for the client to dial in
/// before the transfer command fails with 425.
pub const DATA_ACCEPT_TIMEOUT_SECS: u64 = 30;
