use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::config;
use crate::rows::{self, Selection};

/// Telemetry Server - проигрывает экспорт OpenRocket (CSV) одному клиенту
/// в темпе колонки `Time`, в конце шлёт `END@@`.
#[derive(Parser, Debug, Clone)]
#[command(name = "telemetry-server", version, about)]
pub(crate) struct Args {
    /// CSV экспорт симуляции (строки с `#` - комментарии)
    pub(crate) file: PathBuf,

    /// TCP порт, на котором ждём клиента
    #[arg(value_parser = clap::value_parser!(u16).range(1..=65535))]
    pub(crate) port: u16,

    /// IP для bind
    #[arg(long, default_value = config::DEFAULT_BIND_IP)]
    pub(crate) bind: IpAddr,

    /// Какие колонки слать, через запятую, в нужном порядке
    #[arg(long, default_value = config::DEFAULT_FIELDS, conflicts_with = "all_fields")]
    pub(crate) fields: String,

    /// Слать все колонки экспорта
    #[arg(long)]
    pub(crate) all_fields: bool,
}

impl Args {
    pub(crate) fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub(crate) fn selection(&self) -> rows::Result<Selection> {
        if self.all_fields {
            Ok(Selection::all())
        } else {
            Selection::parse(&self.fields)
        }
    }
}
