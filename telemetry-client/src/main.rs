//! Точка входа `telemetry-client`.
//!
//! Жизненный цикл:
//! - парсинг CLI
//! - TCP-подключение к серверу телеметрии с таймаутом чтения
//! - цикл приёма кадров до `END` (сброс `##` подтверждается внутри ридера)
//! - печать каждой записи в stdout
//!
//! Коды выхода: 0 - поток закончился `END`, 2 - сервер недоступен,
//! 1 - любая другая ошибка (обрыв, таймаут, битый кадр, не выставились
//! таймауты сокета).

mod cli;
mod receiver;
mod tcp;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use telemetry_core::{FrameReader, RecordDecoder};

use receiver::MalformedPolicy;

const EXIT_FAILURE: u8 = 1;
const EXIT_UNREACHABLE: u8 = 2;

fn main() -> ExitCode {
    // Логи через RUST_LOG=info/trace
    env_logger::init();

    // Ctrl+C: блокирующее чтение не прервать, просто выходим
    if let Err(e) = ctrlc::set_handler(|| {
        info!("shutting down...");
        std::process::exit(130);
    }) {
        error!("failed to install Ctrl+C handler: {e}");
    }

    let args = cli::Args::parse();

    let stream = match tcp::connect(&args.host, args.port, args.read_timeout()) {
        Ok(s) => s,
        Err(e) => {
            let code = if e.is_unreachable() {
                EXIT_UNREACHABLE
            } else {
                EXIT_FAILURE
            };
            eprintln!("Error: {:#}", anyhow::Error::new(e));
            return ExitCode::from(code);
        }
    };

    let malformed = if args.skip_malformed {
        MalformedPolicy::Skip
    } else {
        MalformedPolicy::Abort
    };

    let mut reader = FrameReader::new(stream);
    let decoder = RecordDecoder::new(args.number_policy());
    info!(
        "Starting telemetry-client: server={}:{}, timeout={}s, buffer={} bytes, policy={:?}",
        args.host,
        args.port,
        args.timeout_secs,
        reader.config().initial_capacity,
        decoder.policy()
    );

    let stdout = io::stdout();
    let res = receiver::run_receiver(&mut reader, decoder, malformed, &mut stdout.lock());

    match res {
        Ok(summary) => {
            info!("received {} records", summary.records);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let err = anyhow::Error::new(e);
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
