use std::time::Duration;

/// Начальный размер буфера сообщения (MTU минус заголовки)
pub const BUF_SIZE: usize = 1400;

/// Шаг роста буфера: `GROWTH_MULTIPLIER * BUF_SIZE` байт за раз
pub const GROWTH_MULTIPLIER: usize = 4;

/// время, после которого чтение из сокета считается неудачным
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Таймаут записи (ack на `##`, кадры сервера)
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(5);
