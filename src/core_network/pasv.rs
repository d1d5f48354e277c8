//! PASV and EPSV: bind a passive listener and tell the client where to
//! dial.

use std::io;
use std::net::IpAddr;
use std::sync::Arc;

use log::warn;

use crate::config::ServerOpts;
use crate::core_network::data;
use crate::helpers::ReplyWriter;
use crate::session::Session;

/// Handles the PASV command. The advertised host is the configured
/// public IP when set, otherwise the address the client already reached
/// us on.
pub async fn handle_pasv_command(
    writer: &ReplyWriter,
    opts: &Arc<ServerOpts>,
    session: &mut Session,
    _arg: &str,
) -> io::Result<()> {
    let host = opts.public_ip.unwrap_or(session.control_ip);
    let IpAddr::V4(v4) = host else {
        // PASV replies can only carry an IPv4 tuple; EPSV works anywhere.
        return writer.send(425, "Can't open data connection.").await;
    };

    let port = match data::prepare_passive(
        &mut session.data_endpoint,
        session.control_ip,
        opts.passive_ports,
    )
    .await
    {
        Ok(port) => port,
        Err(e) => {
            warn!("#{} passive bind failed: {}", session.id, e);
            return writer.send(425, "Can't open data connection.").await;
        }
    };

    let octets = v4.octets();
    writer
        .send(
            227,
            &format!(
                "Entering Passive Mode ({},{},{},{},{},{}).",
                octets[0],
                octets[1],
                octets[2],
                octets[3],
                port / 256,
                port % 256
            ),
        )
        .await
}

/// Handles the EPSV command.
pub async fn handle_epsv_command(
    writer: &ReplyWriter,
    opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    if arg.eq_ignore_ascii_case("ALL") {
        return writer.send(200, "EPSV ALL ok.").await;
    }

    match data::prepare_passive(
        &mut session.data_endpoint,
        session.control_ip,
        opts.passive_ports,
    )
    .await
    {
        Ok(port) => {
            writer
                .send(229, &format!("Entering Extended Passive Mode (|||{}|)", port))
                .await
        }
        Err(e) => {
            warn!("#{} passive bind failed: {}", session.id, e);
            writer.send(425, "Can't open data connection.").await
        }
    }
}
