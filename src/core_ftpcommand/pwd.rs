use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::{quote_path, ReplyWriter};
use crate::session::Session;

pub async fn handle_pwd_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    writer
        .send(
            257,
            &format!("{} is the current directory.", quote_path(&session.cwd)),
        )
        .await
}
