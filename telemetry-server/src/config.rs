use std::time::Duration;

pub(crate) use telemetry_core::WRITE_TIMEOUT;

/// Шаг ожидания, пока не наступит время строки
pub(crate) const PACING_TICK: Duration = Duration::from_millis(10);

/// Пауза между попытками accept, пока никто не подключился
pub(crate) const ACCEPT_TICK: Duration = Duration::from_millis(50);

pub(crate) const DEFAULT_BIND_IP: &str = "127.0.0.1";

/// Поля по умолчанию - ровно те, что разбирает клиент
pub(crate) const DEFAULT_FIELDS: &str = "Time,Simulation time step,Computation time";

/// Пауза перед `END@@`: клиент выбрасывает хвост чанка после `@@`,
/// и `END@@`, слипшийся с последней строкой, потерялся бы
pub(crate) const END_OF_STREAM_GAP: Duration = Duration::from_millis(100);
