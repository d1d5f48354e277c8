use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::session::Session;

pub async fn handle_noop_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    _session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    writer.send(200, "OK").await
}
