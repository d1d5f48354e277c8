//! Passive data-channel coordination.
//!
//! A session holds at most one pending passive listener at a time. PASV
//! and EPSV bind one here; the next transfer command collects the peer
//! with [`open_data`], which consumes the listener whatever the outcome,
//! so no listener outlives the transfer that used it.

use std::io;
use std::net::IpAddr;
use std::time::Duration;

use log::debug;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use crate::constants::DATA_ACCEPT_TIMEOUT_SECS;

/// Binds a fresh passive listener on `bind_ip`, replacing (and thereby
/// closing) any previously pending listener in `slot`. Returns the bound
/// port for the 227/229 reply.
pub async fn prepare_passive(
    slot: &mut Option<TcpListener>,
    bind_ip: IpAddr,
    passive_ports: Option<(u16, u16)>,
) -> io::Result<u16> {
    *slot = None;
    let listener = match passive_ports {
        None => TcpListener::bind((bind_ip, 0)).await?,
        Some((lo, hi)) => bind_in_range(bind_ip, lo, hi).await?,
    };
    let port = listener.local_addr()?.port();
    debug!("passive listener bound on {}:{}", bind_ip, port);
    *slot = Some(listener);
    Ok(port)
}

async fn bind_in_range(bind_ip: IpAddr, lo: u16, hi: u16) -> io::Result<TcpListener> {
    for port in lo..=hi {
        if let Ok(listener) = TcpListener::bind((bind_ip, port)).await {
            return Ok(listener);
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AddrInUse,
        "no free port in the passive range",
    ))
}

/// Accepts exactly one peer on the pending listener. The listener is
/// consumed in every path; on timeout or failure the slot is simply
/// empty again.
pub async fn open_data(slot: &mut Option<TcpListener>) -> io::Result<TcpStream> {
    let listener = slot.take().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotConnected, "no data connection pending")
    })?;
    match timeout(Duration::from_secs(DATA_ACCEPT_TIMEOUT_SECS), listener.accept()).await {
        Ok(Ok((stream, peer))) => {
            debug!("data connection accepted from {}", peer);
            Ok(stream)
        }
        Ok(Err(e)) => Err(e),
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            "timed out waiting for the data connection",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[tokio::test]
    async fn accepts_one_peer_and_consumes_the_listener() {
        let mut slot = None;
        let port = prepare_passive(&mut slot, LOCALHOST, None).await.unwrap();
        assert!(slot.is_some());

        let dial = tokio::spawn(async move {
            TcpStream::connect((Ipv4Addr::LOCALHOST, port)).await.unwrap()
        });
        let stream = open_data(&mut slot).await.unwrap();
        dial.await.unwrap();
        assert!(slot.is_none());
        drop(stream);
    }

    #[tokio::test]
    async fn open_without_pending_listener_fails() {
        let mut slot = None;
        let err = open_data(&mut slot).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
    }

    #[tokio::test]
    async fn rebinding_replaces_the_pending_listener() {
        let mut slot = None;
        let first = prepare_passive(&mut slot, LOCALHOST, None).await.unwrap();
        let second = prepare_passive(&mut slot, LOCALHOST, None).await.unwrap();
        assert_ne!(first, 0);
        assert_ne!(second, 0);
        // The first port is free again once its listener is replaced.
        let rebound = TcpListener::bind((Ipv4Addr::LOCALHOST, first)).await;
        assert!(rebound.is_ok());
    }

    #[tokio::test]
    async fn port_range_is_honored() {
        let mut slot = None;
        let port = prepare_passive(&mut slot, LOCALHOST, Some((40100, 40110)))
            .await
            .unwrap();
        assert!((40100..=40110).contains(&port));
    }
}
