use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::session::Session;

/// Handles the REST command. The offset applies to the next transfer
/// only; the session loop clears it as soon as anything other than data
/// channel setup follows.
pub async fn handle_rest_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    let Ok(offset) = arg.parse::<u64>() else {
        return writer.send(501, "Syntax error in parameters or arguments.").await;
    };
    session.restart_offset = offset;
    writer
        .send(
            350,
            &format!(
                "Restarting at {}. Send STORE or RETRIEVE to initiate transfer.",
                offset
            ),
        )
        .await
}
