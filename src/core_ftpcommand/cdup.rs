use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::path;
use crate::session::Session;

/// CDUP is CWD to the parent; at the root it stays put.
pub async fn handle_cdup_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    let Some(target) = path::resolve(&session.cwd, "..") else {
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
