use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::session::Session;

pub async fn handle_quit_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    session.closing = true;
    writer.send(221, "Goodbye.").await
}
