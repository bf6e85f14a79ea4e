use std::fmt;

use crate::error::{DecodeError, Field};
use crate::protocol::encode_fields;

/// Значение, которое legacy-режим подставляет вместо нуля и мусора
pub const LEGACY_PARSE_FAILURE: f64 = -1.0;

/// Метки полей, которые шлёт сервер (сами метки при разборе не проверяются)
pub const FIELD_LABELS: [&str; 3] = ["Time", "Simulation time step", "Computation time"];

/// Одна запись телеметрии
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    /// время полёта, с
    pub time: f64,
    /// шаг симуляции, с
    pub sim_time_step: f64,
    /// время вычисления шага, с
    pub comp_time: f64,
}

impl TelemetryRecord {
    /// Текстовый wire-формат: Time:..;Simulation time step:..;Computation time:..;@@
    pub fn to_wire(&self) -> String {
        let values = [
            self.time.to_string(),
            self.sim_time_step.to_string(),
            self.comp_time.to_string(),
        ];
        encode_fields(
            FIELD_LABELS
                .iter()
                .zip(&values)
                .map(|(label, value)| (*label, value.as_str())),
        )
    }
}

impl fmt::Display for TelemetryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Time: {:.6},", self.time)?;
        writeln!(f, "Simulation time step: {:.6},", self.sim_time_step)?;
        write!(f, "Computation time: {:.6}", self.comp_time)
    }
}

/// Как трактовать числовой текст поля
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberPolicy {
    /// Мусор => [`DecodeError::InvalidNumber`], ноль остаётся нулём
    #[default]
    Strict,
    /// Режим совместимости: берётся самый длинный числовой префикс
    /// (`1.5abc` => `1.5`); нет префикса или ноль => `-1.0`
    Legacy,
}

impl NumberPolicy {
    fn parse(self, text: &str) -> Result<f64, DecodeError> {
        let parsed = text.trim().parse::<f64>();
        match self {
            NumberPolicy::Strict => parsed.map_err(|_| DecodeError::InvalidNumber {
                text: text.to_string(),
            }),
            NumberPolicy::Legacy => Ok(parsed
                .or_else(|_| numeric_prefix(text).parse::<f64>())
                .ok()
                .filter(|v| *v != 0.0)
                .unwrap_or(LEGACY_PARSE_FAILURE)),
        }
    }
}

/// Самый длинный десятичный префикс после ведущих пробелов:
/// `[+-]digits[.digits][(e|E)[+-]digits]`. Пустая строка, если цифр нет.
fn numeric_prefix(text: &str) -> &str {
    let s = text.trim_start();
    let b = s.as_bytes();
    let digits_from = |mut i: usize| {
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(b.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if b.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return "";
    }

    // экспонента считается только вместе с цифрами: "7e" => "7"
    if matches!(b.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(b.get(end + 1), Some(b'+' | b'-')));
        let exp_start = end + 1 + sign;
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }
    &s[..end]
}

/// Читает одно поле `label:<float>;`, начиная с `start`.
///
/// Метка - всё до первого `:`, значение - всё до следующего `;`.
/// Возвращает значение и смещение сразу за `;`.
pub fn decode_field(
    text: &str,
    start: usize,
    policy: NumberPolicy,
) -> Result<(f64, usize), DecodeError> {
    let rest = text
        .get(start..)
        .ok_or(DecodeError::MissingColon { offset: start })?;

    let colon = rest
        .find(':')
        .ok_or(DecodeError::MissingColon { offset: start })?;
    let value_start = start + colon + 1;

    let semi = text[value_start..]
        .find(';')
        .ok_or(DecodeError::MissingSemicolon {
            offset: value_start,
        })?;
    let value_end = value_start + semi;

    let value = policy.parse(&text[value_start..value_end])?;
    Ok((value, value_end + 1))
}

/// Разбор собранного сообщения в [`TelemetryRecord`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDecoder {
    policy: NumberPolicy,
}

impl RecordDecoder {
    /// Декодер с заданной политикой чисел
    pub fn new(policy: NumberPolicy) -> Self {
        Self { policy }
    }

    /// Декодер в режиме совместимости (`-1.0` вместо ошибок)
    pub fn legacy() -> Self {
        Self::new(NumberPolicy::Legacy)
    }

    /// Текущая политика
    pub fn policy(&self) -> NumberPolicy {
        self.policy
    }

    /// Три поля по порядку: time, simTimeStep, compTime.
    /// Первая же ошибка прерывает разбор всей записи.
    pub fn decode(&self, text: &str) -> Result<TelemetryRecord, DecodeError> {
        let mut values = [0.0; 3];
        let mut offset = 0;

        for (slot, field) in values.iter_mut().zip(Field::ALL) {
            let (value, next) =
                decode_field(text, offset, self.policy).map_err(|e| e.in_field(field))?;
            *slot = value;
            offset = next;
        }

        let [time, sim_time_step, comp_time] = values;
        Ok(TelemetryRecord {
            time,
            sim_time_step,
            comp_time,
        })
    }
}

/// [`RecordDecoder`] со строгой политикой
pub fn decode_record(text: &str) -> Result<TelemetryRecord, DecodeError> {
    RecordDecoder::default().decode(text)
}
