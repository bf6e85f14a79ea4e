use std::io::{self, Read, Write};

use log::{debug, trace};

use crate::constants::{BUF_SIZE, GROWTH_MULTIPLIER};
use crate::error::FrameError;
use crate::protocol::{END_OF_MESSAGE, RESET};

/// Параметры буфера сообщения
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Начальная ёмкость буфера. Чанк читается размером `initial_capacity - 1`.
    pub initial_capacity: usize,
    /// Буфер растёт на `growth_multiplier * initial_capacity` байт за шаг
    pub growth_multiplier: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            initial_capacity: BUF_SIZE,
            growth_multiplier: GROWTH_MULTIPLIER,
        }
    }
}

impl FrameConfig {
    fn chunk_len(&self) -> usize {
        self.initial_capacity.saturating_sub(1).max(1)
    }

    fn growth_step(&self) -> usize {
        self.initial_capacity
            .saturating_mul(self.growth_multiplier)
            .max(1)
    }
}

/// Что нашлось в чанке
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sentinel {
    /// `@@` на позиции
    EndOfMessage(usize),
    /// `##` где-то в чанке
    Reset,
}

/// Ищет `@@` и `##` только внутри одного чанка.
/// Срабатывает тот маркер, что встретился раньше.
fn scan(chunk: &[u8]) -> Option<Sentinel> {
    let eom = find(chunk, END_OF_MESSAGE.as_bytes());
    let reset = find(chunk, RESET.as_bytes());

    match (eom, reset) {
        (Some(e), Some(r)) if r < e => Some(Sentinel::Reset),
        (Some(e), _) => Some(Sentinel::EndOfMessage(e)),
        (None, Some(_)) => Some(Sentinel::Reset),
        (None, None) => None,
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn zeroed_chunk(len: usize) -> Result<Vec<u8>, FrameError> {
    let mut chunk = Vec::new();
    chunk
        .try_reserve_exact(len)
        .map_err(|source| FrameError::OutOfMemory {
            requested: len,
            source,
        })?;
    chunk.resize(len, 0);
    Ok(chunk)
}

/// Буфер одного сообщения. Ёмкость учитывается отдельно от `Vec`,
/// чтобы рост шёл ровно шагами из [`FrameConfig`].
#[derive(Debug)]
struct MessageBuffer {
    content: Vec<u8>,
    capacity: usize,
    config: FrameConfig,
}

impl MessageBuffer {
    fn new(config: FrameConfig) -> Result<Self, FrameError> {
        let mut buf = Self {
            content: Vec::new(),
            capacity: config.initial_capacity,
            config,
        };
        buf.reserve_to_capacity()?;
        Ok(buf)
    }

    fn reserve_to_capacity(&mut self) -> Result<(), FrameError> {
        let additional = self.capacity - self.content.len();
        self.content
            .try_reserve_exact(additional)
            .map_err(|source| FrameError::OutOfMemory {
                requested: self.capacity,
                source,
            })
    }

    fn append(&mut self, bytes: &[u8]) -> Result<(), FrameError> {
        let needed = self.content.len() + bytes.len();
        if needed > self.capacity {
            while needed > self.capacity {
                self.capacity = self.capacity.saturating_add(self.config.growth_step());
            }
            debug!(
                "growing message buffer: {} -> {} bytes",
                self.content.len(),
                self.capacity
            );
            self.reserve_to_capacity()?;
        }
        self.content.extend_from_slice(bytes);
        Ok(())
    }

    /// Выбрасывает всё накопленное и возвращает начальную ёмкость
    fn reset(&mut self) {
        self.content.clear();
        self.content.shrink_to(self.config.initial_capacity);
        self.capacity = self.config.initial_capacity;
    }

    fn finish(self) -> Result<String, FrameError> {
        Ok(String::from_utf8(self.content)?)
    }
}

/// Собирает текстовые сообщения из потока байт.
///
/// Между вызовами [`FrameReader::next_message`] хранится только транспорт:
/// каждый вызов начинает сообщение с чистого буфера, а байты после `@@`
/// в том же чанке отбрасываются.
#[derive(Debug)]
pub struct FrameReader<T> {
    transport: T,
    config: FrameConfig,
}

impl<T: Read + Write> FrameReader<T> {
    /// Ридер с параметрами по умолчанию (1400 байт, рост x4)
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, FrameConfig::default())
    }

    /// Ридер со своими параметрами буфера
    pub fn with_config(transport: T, config: FrameConfig) -> Self {
        Self { transport, config }
    }

    /// Параметры буфера
    pub fn config(&self) -> FrameConfig {
        self.config
    }

    /// Ссылка на транспорт
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Забрать транспорт обратно
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Читает чанки до `@@` и возвращает текст сообщения без маркера.
    ///
    /// `##` в чанке выбрасывает всё, что накоплено для этого сообщения,
    /// отправляет `##` обратно и продолжает чтение того же сообщения.
    /// Маркер, разрезанный между двумя чтениями, не распознаётся.
    pub fn next_message(&mut self) -> Result<String, FrameError> {
        let mut message = MessageBuffer::new(self.config)?;
        let mut chunk = zeroed_chunk(self.config.chunk_len())?;

        loop {
            let n = self.read_chunk(&mut chunk)?;
            let data = &chunk[..n];
            trace!("read {n} bytes");

            match scan(data) {
                Some(Sentinel::EndOfMessage(end)) => {
                    message.append(&data[..end])?;
                    return message.finish();
                }
                Some(Sentinel::Reset) => {
                    debug!(
                        "reset requested; discarding {} buffered bytes",
                        message.content.len()
                    );
                    message.reset();
                    self.acknowledge_reset()?;
                }
                None => message.append(data)?,
            }
        }
    }

    fn read_chunk(&mut self, chunk: &mut [u8]) -> Result<usize, FrameError> {
        loop {
            match self.transport.read(chunk) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e)
                    if e.kind() == io::ErrorKind::WouldBlock
                        || e.kind() == io::ErrorKind::TimedOut =>
                {
                    return Err(FrameError::Timeout);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn acknowledge_reset(&mut self) -> Result<(), FrameError> {
        self.transport.write_all(RESET.as_bytes())?;
        self.transport.flush()?;
        Ok(())
    }
}
