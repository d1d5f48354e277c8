use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::session::Session;

// Storage is never pre-allocated; the command exists for clients that
// insist on sending it.
pub async fn handle_allo_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    _session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    writer.send(200, "Obsolete.").await
}
