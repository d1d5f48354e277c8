use std::io;
use std::sync::Arc;

use crate::config::ServerOpts;
use crate::helpers::ReplyWriter;
use crate::session::{Session, TransferType};

/// Handles the TYPE command. `A` (optionally `A N`) selects ASCII, `I`
/// and `L 8` select image. Bytes are never transformed either way; the
/// type is tracked only so clients see what they asked for.
pub async fn handle_type_command(
    writer: &ReplyWriter,
    _opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    let mut tokens = arg.split_whitespace();
    let primary = tokens.next().map(|t| t.to_ascii_uppercase());
    let second = tokens.next().map(|t| t.to_ascii_uppercase());

    let chosen = match (primary.as_deref(), second.as_deref()) {
        (Some("A"), None) | (Some("A"), Some("N")) => TransferType::Ascii,
        (Some("I"), None) => TransferType::Image,
        (Some("L"), Some("8")) => TransferType::Image,
        _ => {
            return writer
                .send(504, "Command not implemented for that parameter.")
                .await;
        }
    };

    session.transfer_type = chosen;
    writer
        .send(200, &format!("Type set to {}.", chosen.label()))
        .await
}
