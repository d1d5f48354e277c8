use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::path;
use crate::session::Session;

/// Handles the CWD command. The working directory only moves after the
/// driver confirms the target is a directory the user may enter.
pub async fn handle_cwd_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if arg.is_empty() {
        return writer.send(501, "Syntax error in parameters or arguments.").await;
    }
    let Some(target) = path::resolve(&session.cwd, arg) else {
        return writer.send(553, "Requested action not taken.").await;
    };

    match session.driver.change_dir(&target).await {
        Ok(()) => {
            session.cwd = target;
            writer
                .send(250, &format!("Directory changed to {}.", session.cwd))
                .await
        }
        Err(e) => writer.send(550, &e.to_string()).await,
    }
}
