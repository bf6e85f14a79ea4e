use std::collections::TryReserveError;
use std::fmt;

use thiserror::Error;

/// Верхнеуровневый тип ошибок крейта
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Ошибки сборки сообщения
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Ошибки разбора записи
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Ошибки сборки сообщения из потока
#[derive(Debug, Error)]
pub enum FrameError {
    /// Сервер закрыл соединение посреди сообщения
    #[error("connection closed while reading message")]
    ConnectionClosed,

    /// Чтение не уложилось в таймаут сокета
    #[error("timed out waiting for data from server")]
    Timeout,

    /// Ошибка чтения/записи сокета
    #[error("socket I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Не удалось увеличить буфер сообщения
    #[error("failed to grow message buffer to {requested} bytes")]
    OutOfMemory {
        /// запрошенная ёмкость
        requested: usize,
        /// причина от аллокатора
        #[source]
        source: TryReserveError,
    },

    /// Сообщение не является текстом (протокол только ASCII)
    #[error("message is not valid text: {0}")]
    NotText(#[from] std::string::FromUtf8Error),
}

impl FrameError {
    /// Ошибка транспорта: закрытие, таймаут или I/O.
    /// Сессию продолжать нельзя, но можно переподключиться.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::ConnectionClosed | Self::Timeout | Self::Io(_))
    }
}

/// Поле записи, по порядку следования в сообщении
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `time`
    Time,
    /// `simTimeStep`
    SimTimeStep,
    /// `compTime`
    CompTime,
}

impl Field {
    /// Все поля в порядке следования
    pub const ALL: [Field; 3] = [Field::Time, Field::SimTimeStep, Field::CompTime];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Time => "time",
            Field::SimTimeStep => "simTimeStep",
            Field::CompTime => "compTime",
        };
        f.write_str(name)
    }
}

/// Ошибки разбора записи
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// Нет `:` после метки
    #[error("missing ':' after offset {offset}")]
    MissingColon {
        /// откуда начинали поиск
        offset: usize,
    },

    /// Нет `;` после значения
    #[error("missing ';' after offset {offset}")]
    MissingSemicolon {
        /// откуда начинали поиск
        offset: usize,
    },

    /// Значение не число
    #[error("invalid number {text:?}")]
    InvalidNumber {
        /// исходный текст значения
        text: String,
    },

    /// Ошибка конкретного поля записи
    #[error("field {field}: {source}")]
    InField {
        /// какое поле
        field: Field,
        /// что с ним не так
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    pub(crate) fn in_field(self, field: Field) -> Self {
        DecodeError::InField {
            field,
            source: Box::new(self),
        }
    }
}
