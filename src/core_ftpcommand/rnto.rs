use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::path;
use crate::session::Session;

/// Handles the RNTO command, completing a rename started by RNFR. The
/// pending source is consumed either way.
pub async fn handle_rnto_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    let Some(source) = session.rename_from.take() else {
        return writer.send(550, "RNFR required first.").await;
    };
    if arg.is_empty() {
        return writer.send(501, "Syntax error in parameters or arguments.").await;
    }
    let Some(target) = path::resolve(&session.cwd, arg) else {
        return writer.send(553, "Requested action not taken.").await;
    };

    match session.driver.rename(&source, &target).await {
        Ok(()) => writer.send(250, "File renamed.").await,
        Err(e) => writer.send(550, &e.to_string()).await,
    }
}
