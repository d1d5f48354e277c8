use std::io;
use std::sync::Arc;

use log::warn;
use tokio::io::AsyncWriteExt;

use crate::config::ServerOpts;
use crate::core_ftpcommand::is_connection_error;
use crate::core_network::data;
use crate::helpers::ReplyWriter;
use crate::path;
use crate::session::Session;

/// Handles the RETR command. A restart offset set by REST applies to
/// this transfer and is consumed here.
pub async fn handle_retr_command(
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

    let offset = session.restart_offset;
    session.restart_offset = 0;

    writer.send(150, "Data transfer starting.").await?;

    let mut data = match data::open_data(&mut session.data_endpoint).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("#{} data connection failed: {}", session.id, e);
            return writer.send(425, "Can't open data connection.").await;
        }
    };

    match session.driver.get_file(&target, offset).await {
        Ok((_total, mut stream)) => {
            let copied = async {
                let n = tokio::io::copy(&mut stream, &mut data).await?;
                data.shutdown().await?;
                Ok::<u64, io::Error>(n)
            }
            .await;
            drop(data);
            match copied {
                Ok(n) => {
                    writer
                        .send(226, &format!("Closing data connection, sent {} bytes.", n))
                        .await
                }
                Err(_) => {
                    writer
                        .send(426, "Connection closed; transfer aborted.")
                        .await
                }
            }
        }
        Err(e) => {
            drop(data);
            if is_connection_error(&e) {
                writer.send(426, "Connection closed; transfer aborted.").await
            } else {
                writer.send(550, &e.to_string()).await
            }
        }
    }
}
