use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::session::Session;

// Feature lines carry a single leading space per RFC 2389.
const FEATURES: [&str; 5] = [" UTF8", " SIZE", " MDTM", " REST STREAM", " EPSV"];

pub async fn handle_feat_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    _session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    let body: Vec<String> = FEATURES.iter().map(|f| f.to_string()).collect();
    writer
        .send_multiline(211, "Extensions supported:", &body, "End")
        .await
}
