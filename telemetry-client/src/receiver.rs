use std::io::{self, Read, Write};

use log::{debug, info, warn};
use telemetry_core::protocol::is_end_of_stream;
use telemetry_core::{FrameReader, RecordDecoder, TelemetryError, TelemetryRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ReceiveError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("failed to write report")]
    Report(#[source] io::Error),
}

/// Итог сессии приёма
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ReceiveSummary {
    pub(crate) records: usize,
    pub(crate) skipped: usize,
}

/// Что делать с кадром, который не разобрался
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MalformedPolicy {
    /// остановить сессию (по умолчанию)
    Abort,
    /// предупредить и читать дальше
    Skip,
}

/// Читает кадры до `END`, каждую запись печатает в `out`.
pub(crate) fn run_receiver<T, W>(
    reader: &mut FrameReader<T>,
    decoder: RecordDecoder,
    malformed: MalformedPolicy,
    out: &mut W,
) -> Result<ReceiveSummary, ReceiveError>
where
    T: Read + Write,
    W: Write,
{
    let mut summary = ReceiveSummary::default();

    loop {
        let message = reader.next_message().map_err(TelemetryError::from)?;
        debug!(">>>> {message:?}");

        if is_end_of_stream(&message) {
            info!(
                "end of stream: {} records, {} skipped",
                summary.records, summary.skipped
            );
            return Ok(summary);
        }

        match decoder.decode(&message) {
            Ok(record) => {
                report(out, &record).map_err(ReceiveError::Report)?;
                summary.records += 1;
            }
            Err(e) if malformed == MalformedPolicy::Skip => {
                warn!("skipping malformed message {message:?}: {e}");
                summary.skipped += 1;
            }
            Err(e) => return Err(TelemetryError::from(e).into()),
        }
    }
}

fn report<W: Write>(out: &mut W, record: &TelemetryRecord) -> io::Result<()> {
    writeln!(out, "-----")?;
    writeln!(out, "{record}")?;
    out.flush()
}
