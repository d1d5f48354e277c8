use std::io;
use std::sync::Arc;

use log::warn;

use crate::config::ServerOpts;
use crate::core_ftpcommand::is_connection_error;
use crate::core_network::data;
use crate::helpers::ReplyWriter;
use crate::path;
use crate::session::Session;

/// Handles the STOR command: receive bytes from the data channel into
/// the backend, truncating unless a restart offset is pending.
pub async fn handle_stor_command(
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
    store_file(writer, session, &target, false, "Data transfer starting.").await
}

/// Handles the APPE command: like STOR with append semantics.
pub async fn handle_appe_command(
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
    store_file(writer, session, &target, true, "Data transfer starting.").await
}

/// Handles the STOU command: store under a name not currently taken,
/// probing `name`, `name.1`, `name.2`, … and announcing the winner in
/// the 150 reply.
pub async fn handle_stou_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    let base = if arg.is_empty() { "file" } else { arg };
    let Some(base_path) = path::resolve(&session.cwd, base) else {
        return writer.send(553, "Requested action not taken.").await;
    };

    let mut target = base_path.clone();
    let mut suffix = 0u32;
    while session.driver.stat(&target).await.is_ok() {
        suffix += 1;
        if suffix > 1024 {
            return writer.send(550, "Could not find a unique file name.").await;
        }
        target = format!("{}.{}", base_path, suffix);
    }

    let opening = format!("FILE: {}", target);
    store_file(writer, session, &target, false, &opening).await
}

async fn store_file(
    writer: &ReplyWriter,
    session: &mut Session,
    target: &str,
    append: bool,
    opening: &str,
) -> io::Result<()> {
    let offset = session.restart_offset;
    session.restart_offset = 0;

    writer.send(150, opening).await?;

    let mut data = match data::open_data(&mut session.data_endpoint).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("#{} data connection failed: {}", session.id, e);
            return writer.send(425, "Can't open data connection.").await;
        }
    };

    let stored = session.driver.put_file(target, offset, &mut data, append).await;
    drop(data);

    match stored {
        Ok(n) => writer.send(226, &format!("OK, received {} bytes.", n)).await,
        Err(e) if is_connection_error(&e) => {
            writer.send(426, "Connection closed; transfer aborted.").await
        }
        Err(e) => writer.send(550, &e.to_string()).await,
    }
}
