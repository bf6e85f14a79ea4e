use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use telemetry_core::protocol::END_OF_STREAM_FRAME;

use crate::config::{END_OF_STREAM_GAP, PACING_TICK};
use crate::rows::{Row, Selection};

/// Итог проигрывания
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ReplayStats {
    pub(crate) sent: usize,
    pub(crate) lost: usize,
    pub(crate) reconnects: usize,
    /// `END@@` ушёл клиенту
    pub(crate) finished: bool,
}

/// Шлёт строки в темпе их `Time` с момента первого подключения.
///
/// `accept` отдаёт нового клиента, `None` - сервер останавливается.
/// Если запись не удалась, строка теряется, ждём следующего клиента
/// и продолжаем со следующей строки.
pub(crate) fn run_replay<W, A>(
    rows: &[Row],
    selection: &Selection,
    mut accept: A,
    shutdown: &AtomicBool,
) -> io::Result<ReplayStats>
where
    W: Write,
    A: FnMut() -> io::Result<Option<W>>,
{
    let mut stats = ReplayStats::default();

    let Some(mut conn) = accept()? else {
        return Ok(stats);
    };
    let launch = Instant::now();

    for row in rows {
        let due = Duration::try_from_secs_f64(row.time.max(0.0))
            .ok()
            .and_then(|d| launch.checked_add(d));
        if !wait_until(due, shutdown) {
            info!("shutting down replay at line {}", row.line);
            return Ok(stats);
        }

        let frame = row.encode(selection);
        match send(&mut conn, frame.as_bytes()) {
            Ok(()) => {
                debug!("sent {frame:?}");
                stats.sent += 1;
            }
            Err(e) => {
                warn!("Lost connection ({e})...attempting to reconnect...");
                stats.lost += 1;
                match accept()? {
                    Some(c) => {
                        conn = c;
                        stats.reconnects += 1;
                    }
                    None => return Ok(stats),
                }
            }
        }
    }

    // клиенту - что данных больше нет
    if !wait_until(Instant::now().checked_add(END_OF_STREAM_GAP), shutdown) {
        return Ok(stats);
    }
    send(&mut conn, END_OF_STREAM_FRAME.as_bytes())?;
    stats.finished = true;
    info!(
        "replay finished: {} sent, {} lost, {} reconnects",
        stats.sent, stats.lost, stats.reconnects
    );
    Ok(stats)
}

fn send<W: Write>(conn: &mut W, bytes: &[u8]) -> io::Result<()> {
    conn.write_all(bytes)?;
    conn.flush()
}

/// Спит мелкими шагами до `due` (`None` - никогда). `false` - пришёл shutdown.
fn wait_until(due: Option<Instant>, shutdown: &AtomicBool) -> bool {
    loop {
        if shutdown.load(Ordering::Relaxed) {
            return false;
        }
        let now = Instant::now();
        let step = match due {
            Some(due) if now >= due => return true,
            Some(due) => (due - now).min(PACING_TICK),
            None => PACING_TICK,
        };
        thread::sleep(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::read_rows;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    /// Пишет в общий буфер, после `fail_after` записей отвечает BrokenPipe
    #[derive(Clone)]
    struct Sink {
        out: Arc<Mutex<Vec<u8>>>,
        writes: usize,
        fail_after: Option<usize>,
    }

    impl Sink {
        fn new(fail_after: Option<usize>) -> Self {
            Self {
                out: Arc::new(Mutex::new(Vec::new())),
                writes: 0,
                fail_after,
            }
        }

        fn text(&self) -> String {
            String::from_utf8(self.out.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_after.is_some_and(|n| self.writes >= n) {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "client gone"));
            }
            self.writes += 1;
            self.out.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn rows(times: &[&str]) -> Vec<Row> {
        let input = times
            .iter()
            .map(|t| format!("{t},10"))
            .collect::<Vec<_>>()
            .join("\n");
        read_rows(Cursor::new(input)).unwrap()
    }

    fn time_and_altitude() -> Selection {
        Selection::parse("Time,Altitude").unwrap()
    }

    #[test]
    fn sends_rows_then_end_of_stream() {
        let sink = Sink::new(None);
        let mut first = Some(sink.clone());
        let shutdown = AtomicBool::new(false);

        let stats = run_replay(
            &rows(&["0", "0.01", "0.02"]),
            &time_and_altitude(),
            || Ok(first.take()),
            &shutdown,
        )
        .unwrap();

        assert_eq!(stats.sent, 3);
        assert!(stats.finished);
        assert_eq!(
            sink.text(),
            "Time:0;Altitude:10;@@Time:0.01;Altitude:10;@@Time:0.02;Altitude:10;@@END@@"
        );
    }

    #[test]
    fn rows_are_paced_by_time_column() {
        let sink = Sink::new(None);
        let mut first = Some(sink.clone());
        let shutdown = AtomicBool::new(false);

        let start = Instant::now();
        run_replay(
            &rows(&["0", "0.15"]),
            &time_and_altitude(),
            || Ok(first.take()),
            &shutdown,
        )
        .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn lost_row_then_reconnect_and_continue() {
        let broken = Sink::new(Some(1));
        let fresh = Sink::new(None);
        let mut clients = vec![fresh.clone(), broken.clone()];
        let shutdown = AtomicBool::new(false);

        let stats = run_replay(
            &rows(&["0", "0", "0"]),
            &Selection::parse("Time").unwrap(),
            || Ok(clients.pop()),
            &shutdown,
        )
        .unwrap();

        // первая строка дошла, вторая потерялась, третья ушла новому клиенту
        assert_eq!(stats.sent, 2);
        assert_eq!(stats.lost, 1);
        assert_eq!(stats.reconnects, 1);
        assert_eq!(broken.text(), "Time:0;@@");
        assert_eq!(fresh.text(), "Time:0;@@END@@");
    }

    #[test]
    fn shutdown_before_client_sends_nothing() {
        let shutdown = AtomicBool::new(true);
        let stats = run_replay::<Sink, _>(
            &rows(&["0"]),
            &time_and_altitude(),
            || Ok(None),
            &shutdown,
        )
        .unwrap();
        assert_eq!(stats, ReplayStats::default());
    }

    #[test]
    fn shutdown_stops_waiting_for_next_row() {
        let sink = Sink::new(None);
        let mut first = Some(sink.clone());
        let shutdown = Arc::new(AtomicBool::new(false));

        let sd = shutdown.clone();
        let h = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            sd.store(true, Ordering::Relaxed);
        });

        let stats = run_replay(
            &rows(&["0", "3600"]),
            &time_and_altitude(),
            || Ok(first.take()),
            &shutdown,
        )
        .unwrap();
        h.join().unwrap();

        assert_eq!(stats.sent, 1);
        assert!(!stats.finished);
        assert!(!sink.text().contains("END@@"));
    }

    #[test]
    fn frames_are_readable_by_frame_reader() {
        use std::net::{TcpListener, TcpStream};
        use telemetry_core::protocol::is_end_of_stream;
        use telemetry_core::{FrameReader, decode_record};

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let h = thread::spawn(move || {
            let stream = TcpStream::connect(addr).unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            let mut reader = FrameReader::new(stream);
            let mut records = Vec::new();
            loop {
                let msg = reader.next_message().unwrap();
                if is_end_of_stream(&msg) {
                    return records;
                }
                records.push(decode_record(&msg).unwrap());
            }
        });

        let (conn, _) = listener.accept().unwrap();
        let mut first = Some(conn);
        let shutdown = AtomicBool::new(false);

        let input = [
            "0,1,0.01,0.002",
            "0.2,2,0.01,0.003",
        ]
        .join("\n");
        let rows = read_rows(Cursor::new(input)).unwrap();
        // три поля клиента - из первых колонок, чтобы строки были короткими
        let sel = Selection::parse("Time,Vertical velocity,Vertical acceleration").unwrap();

        let stats = run_replay(&rows, &sel, || Ok(first.take()), &shutdown).unwrap();
        assert!(stats.finished);

        let records = h.join().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].time, 0.2);
        assert_eq!(records[1].comp_time, 0.003);
    }
}
