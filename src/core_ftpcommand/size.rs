use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::path;
use crate::session::Session;

pub async fn handle_size_command(
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

    match session.driver.stat(&target).await {
        Ok(info) if info.is_dir => writer.send(550, "Not a regular file.").await,
        Ok(info) => writer.send(213, &info.size.to_string()).await,
        Err(e) => writer.send(550, &e.to_string()).await,
    }
}
