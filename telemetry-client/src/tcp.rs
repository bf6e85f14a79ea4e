use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, info};
use telemetry_core::WRITE_TIMEOUT;
use thiserror::Error;

/// Не удалось подготовить соединение с сервером
#[derive(Debug, Error)]
pub(crate) enum ConnectError {
    #[error("could not resolve {host}:{port}")]
    Resolve {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("no addresses resolved for {host}:{port}")]
    NoAddress { host: String, port: u16 },

    #[error("could not contact server on port {port}")]
    Connect {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("failed to set socket timeouts on port {port}")]
    Timeout {
        port: u16,
        #[source]
        source: io::Error,
    },
}

impl ConnectError {
    /// Сервер недоступен (код выхода 2), а не сломалась настройка сокета
    pub(crate) fn is_unreachable(&self) -> bool {
        !matches!(self, ConnectError::Timeout { .. })
    }
}

/// Подключается к первому адресу, который ответил, и выставляет таймауты.
pub(crate) fn connect(
    host: &str,
    port: u16,
    read_timeout: Duration,
) -> Result<TcpStream, ConnectError> {
    let addrs: Vec<_> = (host, port)
        .to_socket_addrs()
        .map_err(|source| ConnectError::Resolve {
            host: host.to_string(),
            port,
            source,
        })?
        .collect();

    let mut last_err = None;
    for addr in &addrs {
        match TcpStream::connect(addr) {
            Ok(stream) => {
                info!("connected to {addr}");
                if let Err(e) = stream.set_nodelay(true) {
                    debug!("set_nodelay failed: {e}");
                }
                set_timeouts(&stream, read_timeout)
                    .map_err(|source| ConnectError::Timeout { port, source })?;
                return Ok(stream);
            }
            Err(e) => {
                debug!("connect to {addr} failed: {e}");
                last_err = Some(e);
            }
        }
    }

    match last_err {
        Some(source) => Err(ConnectError::Connect { port, source }),
        None => Err(ConnectError::NoAddress {
            host: host.to_string(),
            port,
        }),
    }
}

// оба таймаута обязательны
fn set_timeouts(stream: &TcpStream, read_timeout: Duration) -> io::Result<()> {
    stream.set_read_timeout(Some(read_timeout))?;
    stream.set_write_timeout(Some(WRITE_TIMEOUT))
}
