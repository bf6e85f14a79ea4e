/// Конец сообщения. В выдаваемый текст сообщения не попадает.
pub const END_OF_MESSAGE: &str = "@@";

/// Конец потока. Проверяется только на уже собранном сообщении.
pub const END_OF_STREAM: &str = "END";

/// Сброс текущего сообщения. Этим же токеном клиент подтверждает сброс.
pub const RESET: &str = "##";

/// Последний кадр, который шлёт сервер
pub const END_OF_STREAM_FRAME: &str = "END@@";

/// Собранное сообщение означает конец потока (содержит `END`).
pub fn is_end_of_stream(message: &str) -> bool {
    message.contains(END_OF_STREAM)
}

/// Форматирует кадр вида:
/// "Time:1.5;Simulation time step:0.25;Computation time:3.0;@@"
pub fn encode_fields<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (label, value) in fields {
        out.push_str(label);
        out.push(':');
        out.push_str(value);
        out.push(';');
    }
    out.push_str(END_OF_MESSAGE);
    out
}
