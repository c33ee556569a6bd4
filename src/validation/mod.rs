//! Валидация и нормализация записей перед коммитом.
//!
//! Функции здесь чистые: на вход - данные клиента, на выход - запись в
//! каноническом виде или `AppError::Validation`. Обращения к хранилищу
//! (проверка ссылок, уникальность) живут в `services`.

pub mod booking;
pub mod event;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationErrors;

use crate::error::AppError;

pub use booking::{normalize_email, validate_booking};
pub use event::{canonicalize_date, canonicalize_time, slugify, validate_event, validate_event_patch};

/// Упрощенный RFC 5322: `local@domain.tld`, без пробелов.
pub static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Пробельный символ для нормализации ввода. Кроме Unicode White_Space
/// сюда входит BOM (U+FEFF), который клиенты оставляют в начале строк.
pub(crate) fn is_blank(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{FEFF}'
}

pub(crate) fn trim(value: &str) -> &str {
    value.trim_matches(is_blank)
}

/// Свернуть ошибки `validator` в одно сообщение. Порядок полей стабильный.
pub(crate) fn into_app_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid"),
                })
                .collect::<Vec<_>>()
        })
        .collect();

    AppError::Validation(messages.join("; "))
}
