use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::path;
use crate::session::Session;

/// Handles the RNFR command, the first half of a rename. The source is
/// remembered only when it exists; any command other than RNTO drops it
/// again.
pub async fn handle_rnfr_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if arg.is_empty() {
        return writer.send(501, "Syntax error in parameters or arguments.").await;
    }
    let Some(source) = path::resolve(&session.cwd, arg) else {
        return writer.send(553, "Requested action not taken.").await;
    };

    match session.driver.stat(&source).await {
        Ok(_) => {
            session.rename_from = Some(source);
            writer.send(350, "Ready for RNTO.").await
        }
        Err(e) => writer.send(550, &e.to_string()).await,
    }
}
