//! Per-connection state and the control-channel loop.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Mutex};

use crate::config::ServerOpts;
use crate::core_driver::Driver;
use crate::core_ftpcommand as cmds;
use crate::core_ftpcommand::FtpCommand;
use crate::core_network::{pasv, port};
use crate::helpers::ReplyWriter;

/// FTP representation type. Tracked for the client's benefit; bytes are
/// never transformed between modes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TransferType {
    #[default]
    Ascii,
    Image,
}

impl TransferType {
    pub fn label(&self) -> &'static str {
        match self {
            TransferType::Ascii => "ASCII",
            TransferType::Image => "Image",
        }
    }
}

/// Everything one control connection owns. Created on accept, dropped
/// when the session ends; no state is shared between sessions.
pub struct Session {
    pub id: u64,
    pub authenticated: bool,
    /// Last USER argument, needed for the PASS check.
    pub username: Option<String>,
    /// Canonical absolute logical working directory.
    pub cwd: String,
    pub transfer_type: TransferType,
    /// Byte offset applied to the next transfer, set by REST.
    pub restart_offset: u64,
    /// Source path of a rename in progress, set by RNFR.
    pub rename_from: Option<String>,
    /// Pending passive listener; at most one per session.
    pub data_endpoint: Option<TcpListener>,
    pub driver: Box<dyn Driver>,
    pub closing: bool,
    /// Local address of the control connection; passive listeners bind
    /// here and PASV advertises it unless a public IP is configured.
    pub control_ip: IpAddr,
    pub peer_addr: SocketAddr,
}

impl Session {
    pub fn new(id: u64, driver: Box<dyn Driver>, control_ip: IpAddr, peer_addr: SocketAddr) -> Self {
        Session {
            id,
            authenticated: false,
            username: None,
            cwd: "/".to_string(),
            transfer_type: TransferType::default(),
            restart_offset: 0,
            rename_from: None,
            data_endpoint: None,
            driver,
            closing: false,
            control_ip,
            peer_addr,
        }
    }
}

/// Runs one control connection to completion: welcome banner, then read,
/// tokenize, gate and dispatch commands until the client quits, the
/// transport dies or the server shuts down.
pub(crate) async fn run_session(
    id: u64,
    stream: TcpStream,
    opts: Arc<ServerOpts>,
    mut shutdown: watch::Receiver<bool>,
) {
    let peer_addr = match stream.peer_addr() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("#{} no peer address: {}", id, e);
            return;
        }
    };
    let control_ip = match stream.local_addr() {
        Ok(addr) => addr.ip(),
        Err(e) => {
            warn!("#{} no local address: {}", id, e);
            return;
        }
    };

    let (read_half, write_half) = stream.into_split();
    let writer = ReplyWriter::new(
        Arc::new(Mutex::new(write_half)),
        Arc::clone(&opts.logger),
        id,
    );

    if *shutdown.borrow() {
        let _ = writer
            .send(421, "Service not available, closing control connection.")
            .await;
        return;
    }

    let driver = match opts.factory.new_driver() {
        Ok(driver) => driver,
        Err(e) => {
            warn!("#{} driver creation failed: {}", id, e);
            let _ = writer
                .send(421, "Service not available, closing control connection.")
                .await;
            return;
        }
    };

    let mut session = Session::new(id, driver, control_ip, peer_addr);
    session.driver.init(id);
    opts.logger
        .print(id, &format!("connection from {}", peer_addr));

    if writer
        .send(220, &format!("{} ready.", opts.name))
        .await
        .is_err()
    {
        let _ = session.driver.close().await;
        return;
    }

    let mut reader = BufReader::new(read_half);
    let mut line = String::new();
    loop {
        line.clear();
        let read = tokio::select! {
            read = reader.read_line(&mut line) => read,
            _ = shutdown.changed() => {
                let _ = writer
                    .send(421, "Service not available, closing control connection.")
                    .await;
                break;
            }
        };
        match read {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("#{} control read failed: {}", id, e);
                break;
            }
        }

        let (verb, arg) = cmds::parse_line(&line);
        if verb.is_empty() {
            continue;
        }
        opts.logger
            .print_command(id, &verb, if verb == "PASS" { "******" } else { arg });

        let Some(cmd) = FtpCommand::from_str(&verb) else {
            if writer
                .send(500, "Syntax error, command unrecognized.")
                .await
                .is_err()
            {
                break;
            }
            continue;
        };

        if !session.authenticated && !cmd.allowed_unauthenticated() {
            if writer.send(530, "Not logged in.").await.is_err() {
                break;
            }
            continue;
        }

        // A pending rename source survives only into an immediate RNTO.
        // RNFR is cleared here too: a successful one re-sets the source,
        // a failing one must not leave an earlier source behind.
        if !matches!(cmd, FtpCommand::RNTO) {
            session.rename_from = None;
        }

        let outcome = dispatch(cmd, &writer, &opts, &mut session, arg).await;

        // A restart offset survives data-channel setup and nothing else;
        // transfers consume it on start.
        if !cmd.preserves_restart_offset() {
            session.restart_offset = 0;
        }

        if let Err(e) = outcome {
            debug!("#{} control write failed: {}", id, e);
            break;
        }
        if session.closing {
            break;
        }
    }

    session.data_endpoint = None;
    if let Err(e) = session.driver.close().await {
        warn!("#{} driver close failed: {}", id, e);
    }
    opts.logger.print(id, "session ended");
}

async fn dispatch(
    cmd: FtpCommand,
    writer: &ReplyWriter,
    opts: &Arc<ServerOpts>,
    session: &mut Session,
    arg: &str,
) -> io::Result<()> {
    match cmd {
        FtpCommand::USER => cmds::user::handle_user_command(writer, opts, session, arg).await,
        FtpCommand::PASS => cmds::pass::handle_pass_command(writer, opts, session, arg).await,
        FtpCommand::QUIT => cmds::quit::handle_quit_command(writer, opts, session, arg).await,
        FtpCommand::NOOP => cmds::noop::handle_noop_command(writer, opts, session, arg).await,
        FtpCommand::SYST => cmds::syst::handle_syst_command(writer, opts, session, arg).await,
        FtpCommand::FEAT => cmds::feat::handle_feat_command(writer, opts, session, arg).await,
        FtpCommand::AUTH => writer.send(502, "TLS is not supported.").await,
        FtpCommand::TYPE => cmds::type_::handle_type_command(writer, opts, session, arg).await,
        FtpCommand::PWD => cmds::pwd::handle_pwd_command(writer, opts, session, arg).await,
        FtpCommand::CWD => cmds::cwd::handle_cwd_command(writer, opts, session, arg).await,
        FtpCommand::CDUP => cmds::cdup::handle_cdup_command(writer, opts, session, arg).await,
        FtpCommand::MKD => cmds::mkd::handle_mkd_command(writer, opts, session, arg).await,
        FtpCommand::RMD => cmds::rmd::handle_rmd_command(writer, opts, session, arg).await,
        FtpCommand::DELE => cmds::dele::handle_dele_command(writer, opts, session, arg).await,
        FtpCommand::RNFR => cmds::rnfr::handle_rnfr_command(writer, opts, session, arg).await,
        FtpCommand::RNTO => cmds::rnto::handle_rnto_command(writer, opts, session, arg).await,
        FtpCommand::SIZE => cmds::size::handle_size_command(writer, opts, session, arg).await,
        FtpCommand::MDTM => cmds::mdtm::handle_mdtm_command(writer, opts, session, arg).await,
        FtpCommand::STAT => cmds::stat::handle_stat_command(writer, opts, session, arg).await,
        FtpCommand::LIST => cmds::list::handle_list_command(writer, opts, session, arg).await,
        FtpCommand::NLST => cmds::list::handle_nlst_command(writer, opts, session, arg).await,
        FtpCommand::PASV => pasv::handle_pasv_command(writer, opts, session, arg).await,
        FtpCommand::EPSV => pasv::handle_epsv_command(writer, opts, session, arg).await,
        FtpCommand::PORT => port::handle_port_command(writer, opts, session, arg).await,
        FtpCommand::EPRT => port::handle_eprt_command(writer, opts, session, arg).await,
        FtpCommand::RETR => cmds::retr::handle_retr_command(writer, opts, session, arg).await,
        FtpCommand::STOR => cmds::stor::handle_stor_command(writer, opts, session, arg).await,
        FtpCommand::STOU => cmds::stor::handle_stou_command(writer, opts, session, arg).await,
        FtpCommand::APPE => cmds::stor::handle_appe_command(writer, opts, session, arg).await,
        FtpCommand::REST => cmds::rest::handle_rest_command(writer, opts, session, arg).await,
        FtpCommand::ALLO => cmds::allo::handle_allo_command(writer, opts, session, arg).await,
        FtpCommand::ABOR => cmds::abor::handle_abor_command(writer, opts, session, arg).await,
    }
}
