use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::{quote_path, ReplyWriter};
use crate::path;
use crate::session::Session;

pub async fn handle_mkd_command(
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

    match session.driver.make_dir(&target).await {
        Ok(()) => {
            writer
                .send(257, &format!("{} created.", quote_path(&target)))
                .await
        }
        Err(e) => writer.send(550, &e.to_string()).await,
    }
}
