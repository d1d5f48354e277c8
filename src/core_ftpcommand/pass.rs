use std::io;
use std::sync::Arc;

use log::{info, warn};

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::session::Session;

/// Handles the PASS command, completing the USER/PASS exchange through
/// the configured authenticator.
pub async fn handle_pass_command(
    writer: &ReplyWriter,
    opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    let Some(username) = session.username.clone() else {
        return writer.send(530, "Send USER first.").await;
    };

    match opts.auth.check_passwd(&username, arg) {
        Ok(true) => {
            session.authenticated = true;
            info!("#{} user {} logged in", session.id, username);
            writer.send(230, "User logged in, proceed.").await
        }
        Ok(false) => {
            info!("#{} failed login for {}", session.id, username);
            writer.send(530, "Incorrect password, not logged in.").await
        }
        Err(e) => {
            warn!("#{} authenticator error: {}", session.id, e);
            writer.send(530, "Not logged in.").await
        }
    }
}
