//! Точка входа `telemetry-server`.
//!
//! Жизненный цикл:
//! - парсинг CLI и загрузка CSV экспорта
//! - ожидание одного TCP-клиента
//! - проигрывание строк в темпе `Time`, при обрыве ждём переподключения
//! - `END@@` в конце
//! - корректная остановка по `Ctrl+C`

mod cli;
mod config;
mod labels;
mod replay;
mod rows;
mod tcp;

use std::sync::{Arc, atomic::AtomicBool, atomic::Ordering};

use anyhow::Context;
use clap::Parser;
use log::info;

fn main() -> anyhow::Result<()> {
    // Логи через RUST_LOG=info/trace
    env_logger::init();

    let shutdown = Arc::new(AtomicBool::new(false));

    // Ctrl+C => ставим shutdown=true
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::Relaxed);
            info!("shutting down...");
        })?;
    }

    let args = cli::Args::parse();

    let selection = args.selection()?;
    let rows = rows::read_rows_from_path(&args.file)?;
    selection.check(&rows)?;

    info!(
        "Starting telemetry-server: bind={}, file={:?}, rows={}",
        args.bind_addr(),
        args.file,
        rows.len()
    );

    let listener = tcp::bind(args.bind_addr())?;
    let stats = replay::run_replay(
        &rows,
        &selection,
        || tcp::accept_client(&listener, &shutdown),
        &shutdown,
    )
    .context("replay failed")?;

    if !stats.finished {
        info!("stopped before end of data ({} rows sent)", stats.sent);
    }

    Ok(())
}
