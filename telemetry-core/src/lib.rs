//! # telemetry-core
//!
//! Протокол текстовой телеметрии поверх TCP: сборка сообщений из потока
//! и разбор записей.
//!
//! Этот крейт содержит:
//!
//! - [`frame`] — сборка сообщений из чанков произвольной длины (`@@`, `##`)
//! - [`record`] — разбор `label:<float>;` полей в [`TelemetryRecord`]
//! - [`protocol`] — маркеры протокола и форматирование кадров
//! - [`error`] — типы ошибок, которые возвращают компоненты `telemetry-core`
//!
//! ## Быстрый пример: поток из двух кадров
//!
//! ```rust
//! use std::io::{self, Read, Write};
//! use telemetry_core::{FrameReader, decode_record, protocol::is_end_of_stream};
//!
//! // один элемент = одно чтение из сокета
//! struct Frames(Vec<&'static [u8]>);
//!
//! impl Read for Frames {
//!     fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
//!         if self.0.is_empty() {
//!             return Ok(0);
//!         }
//!         let chunk = self.0.remove(0);
//!         buf[..chunk.len()].copy_from_slice(chunk);
//!         Ok(chunk.len())
//!     }
//! }
//!
//! impl Write for Frames {
//!     fn write(&mut self, buf: &[u8]) -> io::Result<usize> { Ok(buf.len()) }
//!     fn flush(&mut self) -> io::Result<()> { Ok(()) }
//! }
//!
//! let mut reader = FrameReader::new(Frames(vec![&b"t:1.5;s:0.25;c:3.0;@@"[..], &b"END@@"[..]]));
//!
//! let msg = reader.next_message().unwrap();
//! assert!(!is_end_of_stream(&msg));
//! let rec = decode_record(&msg).unwrap();
//! assert_eq!((rec.time, rec.sim_time_step, rec.comp_time), (1.5, 0.25, 3.0));
//!
//! let last = reader.next_message().unwrap();
//! assert!(is_end_of_stream(&last));
//! ```
//!
//! ## Дизайн
//!
//! Ядро синхронное и однопоточное: одно соединение, одно чтение за раз.
//! Таймауты задаёт сам сокет, повторов внутри нет - решение о
//! переподключении принимает вызывающий код.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Сборка сообщений из потока байт.
pub mod frame;

/// Разбор полей и записей телеметрии.
pub mod record;

/// Маркеры протокола и форматирование кадров.
pub mod protocol;

/// Ошибки `telemetry-core`.
pub mod error;

/// Общие константы
mod constants;
pub use constants::{BUF_SIZE, GROWTH_MULTIPLIER, READ_TIMEOUT, WRITE_TIMEOUT};

// --- Re-exports (публичный фасад API) ---

pub use crate::error::{DecodeError, Field, FrameError, TelemetryError};
pub use crate::frame::{FrameConfig, FrameReader};
pub use crate::record::{NumberPolicy, RecordDecoder, TelemetryRecord, decode_field, decode_record};
