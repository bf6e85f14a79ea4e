use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::Context;
use log::{info, warn};

use crate::config::{ACCEPT_TICK, WRITE_TIMEOUT};

pub(crate) fn bind(addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(addr).with_context(|| format!("bind TCP listener {addr}"))?;
    listener
        .set_nonblocking(true)
        .context("listener.set_nonblocking(true)")?;
    Ok(listener)
}

/// Ждёт одного клиента. `None` - пришёл shutdown.
pub(crate) fn accept_client(
    listener: &TcpListener,
    shutdown: &AtomicBool,
) -> io::Result<Option<TcpStream>> {
    let port = listener.local_addr()?.port();
    info!("Waiting for client to connect on port {port} ...");

    loop {
        if shutdown.load(Ordering::Relaxed) {
            return Ok(None);
        }

        match listener.accept() {
            Ok((stream, addr)) => {
                stream.set_nonblocking(false)?;
                stream.set_nodelay(true).ok();
                stream.set_write_timeout(Some(WRITE_TIMEOUT)).ok();
                info!("Connected to {addr}");
                return Ok(Some(stream));
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                // нет новых соединений прямо сейчас
                thread::sleep(ACCEPT_TICK);
            }
            Err(e) => {
                warn!("accept error: {e}");
                thread::sleep(ACCEPT_TICK);
            }
        }
    }
}
