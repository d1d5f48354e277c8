use std::io;
use std::sync::Arc;

use chrono::Utc;

use crate::config::ServerOpts;
use crate::core_ftpcommand::list::collect_entries;
use crate::core_network::listing;
use crate::helpers::ReplyWriter;
use crate::path;
use crate::session::Session;

/// Handles the STAT command. Without an argument it reports session
/// status; with a path it sends the directory listing over the control
/// channel instead of a data connection.
pub async fn handle_stat_command(
    writer: &ReplyWriter,
    opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if arg.is_empty() {
        let body = vec![
            format!(" Connected from {}", session.peer_addr),
            format!(
                " Logged in as {}",
                session.username.as_deref().unwrap_or("-")
            ),
            format!(" TYPE: {}", session.transfer_type.label()),
            " Passive data transfers only".to_string(),
        ];
        return writer
            .send_multiline(
                211,
                &format!("{} server status:", opts.name),
                &body,
                "End of status",
            )
            .await;
    }

    let Some(target) = path::resolve(&session.cwd, arg) else {
        return writer.send(553, "Requested action not taken.").await;
    };

    let entries = match collect_entries(session, &target).await {
        Ok(entries) => entries,
        Err(e) => return writer.send(550, &e.to_string()).await,
    };

    let now = Utc::now();
    let body: Vec<String> = entries
        .iter()
        .map(|info| format!(" {}", listing::format_entry(info, now)))
        .collect();
    writer
        .send_multiline(213, "Status follows:", &body, "End of status")
        .await
}
