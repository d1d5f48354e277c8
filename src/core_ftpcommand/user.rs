use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::session::Session;

/// Handles the USER command. Records the name for the PASS check; a
/// repeated USER restarts the login exchange.
pub async fn handle_user_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if arg.is_empty() {
        return writer.send(501, "Syntax error in parameters or arguments.").await;
    }
    session.username = Some(arg.to_string());
    session.authenticated = false;
    writer.send(331, "User name ok, password required.").await
}
