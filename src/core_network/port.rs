//! PORT and EPRT are recognized for interoperability but refused: this
//! server only speaks passive mode. Well-formed arguments get 502,
//! garbage gets 501.

use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::session::Session;

pub async fn handle_port_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    _session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if !is_valid_port_argument(arg) {
        return writer.send(501, "Syntax error in parameters or arguments.").await;
    }
    writer.send(502, "Active mode is not supported, use PASV.").await
}

pub async fn handle_eprt_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    _session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if !is_valid_eprt_argument(arg) {
        return writer.send(501, "Syntax error in parameters or arguments.").await;
    }
    writer.send(502, "Active mode is not supported, use EPSV.").await
}

// h1,h2,h3,h4,p1,p2
fn is_valid_port_argument(arg: &str) -> bool {
    let parts: Vec<&str> = arg.split(',').collect();
    parts.len() == 6 && parts.iter().all(|p| p.trim().parse::<u8>().is_ok())
}

// |proto|host|port| with an arbitrary delimiter byte.
fn is_valid_eprt_argument(arg: &str) -> bool {
    let Some(delim) = arg.chars().next() else {
        return false;
    };
    let parts: Vec<&str> = arg.split(delim).collect();
    if parts.len() != 5 || !parts[0].is_empty() || !parts[4].is_empty() {
        return false;
    }
    let proto_ok = matches!(parts[1], "1" | "2");
    proto_ok && !parts[2].is_empty() && parts[3].parse::<u16>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_argument_validation() {
        assert!(is_valid_port_argument("127,0,0,1,200,10"));
        assert!(!is_valid_port_argument("127,0,0,1,200"));
        assert!(!is_valid_port_argument("327,0,0,1,200,10"));
        assert!(!is_valid_port_argument("garbage"));
    }

    #[test]
    fn eprt_argument_validation() {
        assert!(is_valid_eprt_argument("|1|132.235.1.2|6275|"));
        assert!(is_valid_eprt_argument("|2|1080::8:800:200C:417A|5282|"));
        assert!(!is_valid_eprt_argument("|3|1.2.3.4|80|"));
        assert!(!is_valid_eprt_argument("|1|1.2.3.4|"));
        assert!(!is_valid_eprt_argument(""));
    }
}
