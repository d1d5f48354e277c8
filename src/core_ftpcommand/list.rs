use std::io;
use std::sync::Arc;

use chrono::Utc;
use log::warn;
use tokio::io::AsyncWriteExt;

use crate::config::ServerOpts;
use crate::core_driver::FileInfo;
use crate::core_network::{data, listing};
use crate::helpers::ReplyWriter;
use crate::path;
use crate::session::Session;

/// Handles the LIST command: Unix-style listing lines over the data
/// channel.
pub async fn handle_list_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    let Some(target) = path::resolve(&session.cwd, strip_flags(arg)) else {
        return writer.send(553, "Requested action not taken.").await;
    };

    let now = Utc::now();
    send_over_data(writer, session, &target, move |entries| {
        let mut body = String::new();
        for info in entries {
            body.push_str(&listing::format_entry(info, now));
            body.push_str("\r\n");
        }
        body
    })
    .await
}

/// Handles the NLST command: one basename per line over the data channel.
pub async fn handle_nlst_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    let Some(target) = path::resolve(&session.cwd, strip_flags(arg)) else {
        return writer.send(553, "Requested action not taken.").await;
    };

    send_over_data(writer, session, &target, |entries| {
        let mut body = String::new();
        for info in entries {
            body.push_str(&info.name);
            body.push_str("\r\n");
        }
        body
    })
    .await
}

async fn send_over_data(
    writer: &ReplyWriter,
    session: &mut Session,
    target: &str,
    render: impl FnOnce(&[FileInfo]) -> String,
) -> io::Result<()> {
    writer
        .send(150, "Opening ASCII mode data connection for file list.")
        .await?;

    let mut data = match data::open_data(&mut session.data_endpoint).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("#{} data connection failed: {}", session.id, e);
            return writer.send(425, "Can't open data connection.").await;
        }
    };

    let entries = match collect_entries(session, target).await {
        Ok(entries) => entries,
        Err(e) => return writer.send(550, &e.to_string()).await,
    };

    let body = render(&entries);
    let sent = async {
        data.write_all(body.as_bytes()).await?;
        data.shutdown().await
    }
    .await;
    drop(data);

    match sent {
        Ok(()) => writer.send(226, "Closing data connection.").await,
        Err(_) => writer.send(426, "Connection closed; transfer aborted.").await,
    }
}

pub(crate) async fn collect_entries(
    session: &mut Session,
    target: &str,
) -> io::Result<Vec<FileInfo>> {
    let mut entries = Vec::new();
    session
        .driver
        .list_dir(target, &mut |info| {
            entries.push(info.clone());
            Ok(())
        })
        .await?;
    Ok(entries)
}

// Clients love `LIST -al`; flag words are ignored and the current
// directory is listed instead.
fn strip_flags(arg: &str) -> &str {
    if arg.starts_with('-') {
        ""
    } else {
        arg
    }
}
