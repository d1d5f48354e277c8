use std::io;
use std::sync::Arc;

use log::warn;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::session::Session;

/// Handles the ABOR command. Transfers run synchronously on the session
/// task, so by the time this executes any transfer has already finished;
/// what remains is to drop an idle passive listener and give the driver
/// a chance to cancel whatever it still holds.
pub async fn handle_abor_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    session.data_endpoint = None;
    if let Err(e) = session.driver.abort().await {
        warn!("#{} driver abort failed: {}", session.id, e);
    }
    writer.send(226, "ABOR command processed.").await
}
