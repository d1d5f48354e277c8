use log::{debug, info};

/// Structured sink for per-session commands, replies and free-form logs.
///
/// The session loop masks PASS arguments before they reach
/// `print_command`.
pub trait Logger: Send + Sync {
    fn print(&self, session_id: u64, message: &str);
    fn print_command(&self, session_id: u64, verb: &str, arg: &str);
    fn print_response(&self, session_id: u64, code: u16, text: &str);
}

/// Swallows everything. Useful in tests and quiet embeddings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardLogger;

impl Logger for DiscardLogger {
    fn print(&self, _session_id: u64, _message: &str) {}
    fn print_command(&self, _session_id: u64, _verb: &str, _arg: &str) {}
    fn print_response(&self, _session_id: u64, _code: u16, _text: &str) {}
}

/// Routes session traffic to the `log` facade: commands and free-form
/// messages at info, replies at debug.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdLogger;

impl Logger for StdLogger {
    fn print(&self, session_id: u64, message: &str) {
        info!("#{} {}", session_id, message);
    }

    fn print_command(&self, session_id: u64, verb: &str, arg: &str) {
        if arg.is_empty() {
            info!("#{} > {}", session_id, verb);
        } else {
            info!("#{} > {} {}", session_id, verb, arg);
        }
    }

    fn print_response(&self, session_id: u64, code: u16, text: &str) {
        debug!("#{} < {} {}", session_id, code, text);
    }
}
