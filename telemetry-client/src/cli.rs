use std::time::Duration;

use clap::Parser;
use telemetry_core::{NumberPolicy, READ_TIMEOUT};

/// Telemetry Client - читает кадры телеметрии с сервера и печатает записи.
///
/// Кадр: `label:<float>;label:<float>;label:<float>;@@`.
/// Кадр с `END` завершает приём.
#[derive(Parser, Debug, Clone)]
#[command(name = "telemetry-client", version, about)]
pub(crate) struct Args {
    /// TCP порт сервера телеметрии
    #[arg(value_parser = clap::value_parser!(u16).range(1..=65535))]
    pub(crate) port: u16,

    /// Хост сервера
    #[arg(long, default_value = "localhost")]
    pub(crate) host: String,

    /// Таймаут чтения из сокета, секунды
    #[arg(
        long,
        default_value_t = READ_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub(crate) timeout_secs: u64,

    /// Старое поведение разбора: берётся числовой префикс, ноль и мусор => -1.0
    #[arg(long)]
    pub(crate) legacy_zero: bool,

    /// Пропускать кадры, которые не разбираются, вместо остановки
    #[arg(long)]
    pub(crate) skip_malformed: bool,
}

impl Args {
    pub(crate) fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn number_policy(&self) -> NumberPolicy {
        if self.legacy_zero {
            NumberPolicy::Legacy
        } else {
            NumberPolicy::Strict
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_localhost_and_five_seconds() {
        let args = Args::try_parse_from(["telemetry-client", "5555"]).unwrap();
        assert_eq!(args.port, 5555);
        assert_eq!(args.host, "localhost");
        assert_eq!(args.read_timeout(), Duration::from_secs(5));
        assert_eq!(args.number_policy(), NumberPolicy::Strict);
        assert!(!args.skip_malformed);
    }

    #[test]
    fn non_numeric_or_zero_port_rejected() {
        assert!(Args::try_parse_from(["telemetry-client", "http"]).is_err());
        assert!(Args::try_parse_from(["telemetry-client", "0"]).is_err());
        assert!(Args::try_parse_from(["telemetry-client"]).is_err());
    }

    #[test]
    fn flags_select_policies() {
        let args = Args::try_parse_from([
            "telemetry-client",
            "7000",
            "--host",
            "10.0.0.2",
            "--timeout-secs",
            "1",
            "--legacy-zero",
            "--skip-malformed",
        ])
        .unwrap();
        assert_eq!(args.host, "10.0.0.2");
        assert_eq!(args.read_timeout(), Duration::from_secs(1));
        assert_eq!(args.number_policy(), NumberPolicy::Legacy);
        assert!(args.skip_malformed);
    }
}
