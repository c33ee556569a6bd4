use chrono::{DateTime, Datelike, NaiveDate, Utc};
use validator::Validate;

use super::{is_blank, trim};
use crate::error::{AppError, AppResult};
use crate::models::{Event, EventMode, EventPayload, NewEvent};

// Форматы, которые принимаем на вход. Хранится всегда %Y-%m-%d.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Slug из заголовка: нижний регистр, только `[a-z0-9_]`, пробелы и дефисы
/// схлопываются в один дефис, дефисы по краям убираются.
///
/// Повторный вызов на готовом slug ничего не меняет.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    for ch in trim(&lowered).chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if is_blank(ch) || ch == '-' {
            pending_dash = true;
        }
        // Прочие символы выбрасываются без следа
    }

    slug
}

/// Разобрать календарную дату и вернуть ее как `YYYY-MM-DD`.
pub fn canonicalize_date(input: &str) -> AppResult<String> {
    let input = trim(input);

    let parsed = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .or_else(|| {
            // Дата-время с зоной: берем календарную дату в UTC
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        });

    match parsed {
        Some(date) if (0..=9999).contains(&date.year()) => {
            Ok(date.format("%Y-%m-%d").to_string())
        }
        _ => Err(AppError::validation("invalid date")),
    }
}

/// Проверить время `H:MM`/`HH:MM` (0-23, 00-59) и дополнить часы нулем.
pub fn canonicalize_time(input: &str) -> AppResult<String> {
    let invalid = || AppError::validation("invalid time");

    let (hours, minutes) = trim(input).split_once(':').ok_or_else(invalid)?;

    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(hours) || hours.len() > 2 || !digits(minutes) || minutes.len() != 2 {
        return Err(invalid());
    }

    let h: u8 = hours.parse().map_err(|_| invalid())?;
    let m: u8 = minutes.parse().map_err(|_| invalid())?;
    if h > 23 || m > 59 {
        return Err(invalid());
    }

    Ok(format!("{h:02}:{m:02}"))
}

/// Полная проверка нового события. Любая ошибка отклоняет запись целиком.
pub fn validate_event(payload: EventPayload) -> AppResult<NewEvent> {
    let title = text(payload.title);

    let event = NewEvent {
        slug: slugify(&title),
        title,
        description: text(payload.description),
        overview: text(payload.overview),
        image: text(payload.image),
        venue: text(payload.venue),
        location: text(payload.location),
        date: canonicalize_date(&required("date", payload.date)?)?,
        time: canonicalize_time(&required("time", payload.time)?)?,
        mode: required("mode", payload.mode)?.parse()?,
        audience: text(payload.audience),
        agenda: items("agenda", payload.agenda.unwrap_or_default())?,
        organizer: text(payload.organizer),
        tags: items("tags", payload.tags.unwrap_or_default())?,
    };

    check(&event)?;
    Ok(event)
}

/// Применить изменения к существующему событию.
///
/// Нормализуются только присланные поля; остальное берется как есть из
/// `current`. Slug пересчитывается только при смене заголовка.
pub fn validate_event_patch(current: &Event, patch: EventPayload) -> AppResult<NewEvent> {
    let mut next = NewEvent::from_stored(current.clone());

    if let Some(title) = patch.title {
        next.title = trim(&title).to_string();
        next.slug = slugify(&next.title);
    }
    set_text(&mut next.description, patch.description);
    set_text(&mut next.overview, patch.overview);
    set_text(&mut next.image, patch.image);
    set_text(&mut next.venue, patch.venue);
    set_text(&mut next.location, patch.location);
    set_text(&mut next.audience, patch.audience);
    set_text(&mut next.organizer, patch.organizer);

    if let Some(date) = patch.date {
        next.date = canonicalize_date(&date)?;
    }
    if let Some(time) = patch.time {
        next.time = canonicalize_time(&time)?;
    }
    if let Some(mode) = patch.mode {
        next.mode = mode.parse::<EventMode>()?;
    }
    if let Some(agenda) = patch.agenda {
        next.agenda = items("agenda", agenda)?;
    }
    if let Some(tags) = patch.tags {
        next.tags = items("tags", tags)?;
    }

    check(&next)?;
    Ok(next)
}

/// Повторная проверка перед записью: запись должна быть ровно такой,
/// какой ее вернула бы нормализация.
pub(crate) fn ensure_canonical(event: &NewEvent) -> AppResult<()> {
    check(event)?;

    let texts = [
        &event.title,
        &event.description,
        &event.overview,
        &event.image,
        &event.venue,
        &event.location,
        &event.audience,
        &event.organizer,
    ];
    let lists = event.agenda.iter().chain(event.tags.iter());
    if texts.into_iter().chain(lists).any(|v| v.is_empty() || trim(v) != v) {
        return Err(AppError::validation("fields must be trimmed and non-empty"));
    }

    if event.slug != slugify(&event.title) {
        return Err(AppError::validation("slug does not match title"));
    }
    if canonicalize_date(&event.date)? != event.date {
        return Err(AppError::validation("invalid date"));
    }
    if canonicalize_time(&event.time)? != event.time {
        return Err(AppError::validation("invalid time"));
    }
    Ok(())
}

fn check(event: &NewEvent) -> AppResult<()> {
    event.validate().map_err(super::into_app_error)?;
    if event.slug.is_empty() {
        return Err(AppError::validation(
            "title must contain at least one letter or digit",
        ));
    }
    Ok(())
}

fn text(value: Option<String>) -> String {
    value.map(|v| trim(&v).to_string()).unwrap_or_default()
}

fn set_text(field: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *field = trim(&v).to_string();
    }
}

fn required(field: &str, value: Option<String>) -> AppResult<String> {
    match value {
        Some(v) if !trim(&v).is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

fn items(field: &str, values: Vec<String>) -> AppResult<Vec<String>> {
    values
        .into_iter()
        .map(|v| {
            let v = trim(&v).to_string();
            if v.is_empty() {
                Err(AppError::Validation(format!("{field} items cannot be blank")))
            } else {
                Ok(v)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn payload() -> EventPayload {
        EventPayload {
            title: Some("  RustConf 2025  ".to_string()),
            description: Some(" The Rust conference ".to_string()),
            overview: Some("Talks and workshops".to_string()),
            image: Some("/images/rustconf.png".to_string()),
            venue: Some("Convention Center".to_string()),
            location: Some("Seattle, WA".to_string()),
            date: Some("2025-09-02".to_string()),
            time: Some("9:30".to_string()),
            mode: Some("Hybrid".to_string()),
            audience: Some("Rustaceans".to_string()),
            agenda: Some(vec![" Keynote ".to_string(), "Lunch".to_string()]),
            organizer: Some("Rust Foundation".to_string()),
            tags: Some(vec!["rust".to_string(), "conference".to_string()]),
        }
    }

    fn stored(event: NewEvent) -> Event {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        event.into_event(Uuid::new_v4(), now)
    }

    #[test]
    fn slugify_basic_cases() {
        assert_eq!(slugify("My Cool Talk!!"), "my-cool-talk");
        assert_eq!(slugify("  Hello   World  "), "hello-world");
        assert_eq!(slugify("a - b -- c"), "a-b-c");
        assert_eq!(slugify("--Leading and trailing--"), "leading-and-trailing");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
        assert_eq!(slugify("Café Meetup"), "caf-meetup");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn byte_order_mark_counts_as_whitespace() {
        assert_eq!(slugify("a\u{FEFF}b"), "a-b");
        assert_eq!(slugify("\u{FEFF}Launch Day\u{FEFF}"), "launch-day");
        assert_eq!(canonicalize_time("\u{FEFF}9:30").unwrap(), "09:30");
    }

    #[test]
    fn slugify_is_idempotent_on_examples() {
        for title in ["My Cool Talk!!", "a - b", "Rust & WebAssembly: 2025", "_x_"] {
            let once = slugify(title);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn date_formats_are_canonicalized() {
        assert_eq!(canonicalize_date("2025-03-05").unwrap(), "2025-03-05");
        assert_eq!(canonicalize_date("2025/3/5").unwrap(), "2025-03-05");
        assert_eq!(canonicalize_date("03/05/2025").unwrap(), "2025-03-05");
        assert_eq!(canonicalize_date("March 5, 2025").unwrap(), "2025-03-05");
        assert_eq!(canonicalize_date("5 March 2025").unwrap(), "2025-03-05");
        assert_eq!(canonicalize_date(" 2025-03-05 ").unwrap(), "2025-03-05");
    }

    #[test]
    fn rfc3339_uses_utc_calendar_date() {
        assert_eq!(
            canonicalize_date("2025-03-05T23:30:00-05:00").unwrap(),
            "2025-03-06"
        );
    }

    #[test]
    fn impossible_dates_are_rejected() {
        for bad in ["2025-13-40", "2025-02-30", "not a date", "", "tomorrow"] {
            assert_eq!(
                canonicalize_date(bad).unwrap_err(),
                AppError::Validation("invalid date".to_string()),
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn time_is_zero_padded() {
        assert_eq!(canonicalize_time("9:05").unwrap(), "09:05");
        assert_eq!(canonicalize_time("23:59").unwrap(), "23:59");
        assert_eq!(canonicalize_time("00:00").unwrap(), "00:00");
        assert_eq!(canonicalize_time("0:00").unwrap(), "00:00");
    }

    #[test]
    fn bad_times_are_rejected() {
        for bad in ["24:00", "9:5", "12:60", "123:00", "12", "ab:cd", "-1:30", "12:5a", ""] {
            assert_eq!(
                canonicalize_time(bad).unwrap_err(),
                AppError::Validation("invalid time".to_string()),
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn valid_payload_is_normalized() {
        let event = validate_event(payload()).unwrap();
        assert_eq!(event.title, "RustConf 2025");
        assert_eq!(event.slug, "rustconf-2025");
        assert_eq!(event.description, "The Rust conference");
        assert_eq!(event.time, "09:30");
        assert_eq!(event.mode, EventMode::Hybrid);
        assert_eq!(event.agenda, vec!["Keynote", "Lunch"]);
    }

    #[test]
    fn missing_required_string_is_rejected() {
        let mut p = payload();
        p.venue = Some("   ".to_string());
        assert_eq!(
            validate_event(p).unwrap_err(),
            AppError::Validation("venue is required".to_string())
        );
    }

    #[test]
    fn several_missing_fields_are_reported_together() {
        let mut p = payload();
        p.image = None;
        p.audience = None;
        assert_eq!(
            validate_event(p).unwrap_err(),
            AppError::Validation("audience is required; image is required".to_string())
        );
    }

    #[test]
    fn empty_sequences_are_rejected() {
        let mut p = payload();
        p.tags = Some(vec![]);
        assert_eq!(
            validate_event(p).unwrap_err(),
            AppError::Validation("tags must contain at least one item".to_string())
        );

        let mut p = payload();
        p.agenda = None;
        assert_eq!(
            validate_event(p).unwrap_err(),
            AppError::Validation("agenda must contain at least one item".to_string())
        );

        let mut p = payload();
        p.agenda = Some(vec!["Keynote".to_string(), " ".to_string()]);
        assert_eq!(
            validate_event(p).unwrap_err(),
            AppError::Validation("agenda items cannot be blank".to_string())
        );
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let mut p = payload();
        p.mode = Some("in-person".to_string());
        assert!(matches!(validate_event(p), Err(AppError::Validation(_))));
    }

    #[test]
    fn title_without_word_characters_is_rejected() {
        let mut p = payload();
        p.title = Some("!!!".to_string());
        assert_eq!(
            validate_event(p).unwrap_err(),
            AppError::Validation("title must contain at least one letter or digit".to_string())
        );
    }

    #[test]
    fn patch_touches_only_supplied_fields() {
        let current = stored(validate_event(payload()).unwrap());
        let patch = EventPayload {
            time: Some("7:45".to_string()),
            ..Default::default()
        };

        let next = validate_event_patch(&current, patch).unwrap();
        assert_eq!(next.time, "07:45");
        assert_eq!(next.slug, current.slug);
        assert_eq!(next.date, current.date);
        assert_eq!(next.title, current.title);
    }

    #[test]
    fn patch_with_new_title_rederives_slug() {
        let current = stored(validate_event(payload()).unwrap());
        let patch = EventPayload {
            title: Some("RustConf: Reloaded!".to_string()),
            ..Default::default()
        };

        let next = validate_event_patch(&current, patch).unwrap();
        assert_eq!(next.slug, "rustconf-reloaded");
    }

    #[test]
    fn patch_with_bad_date_is_rejected_whole() {
        let current = stored(validate_event(payload()).unwrap());
        let patch = EventPayload {
            title: Some("New title".to_string()),
            date: Some("2025-13-40".to_string()),
            ..Default::default()
        };

        assert_eq!(
            validate_event_patch(&current, patch).unwrap_err(),
            AppError::Validation("invalid date".to_string())
        );
    }

    #[test]
    fn patch_cannot_blank_a_required_field() {
        let current = stored(validate_event(payload()).unwrap());
        let patch = EventPayload {
            organizer: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_event_patch(&current, patch).unwrap_err(),
            AppError::Validation("organizer is required".to_string())
        );
    }

    #[test]
    fn normalized_event_is_canonical() {
        let event = validate_event(payload()).unwrap();
        assert_eq!(ensure_canonical(&event), Ok(()));
    }

    #[test]
    fn hand_built_event_is_not_canonical() {
        let good = validate_event(payload()).unwrap();

        let bad_date = NewEvent { date: "2025-13-40".to_string(), ..good.clone() };
        assert_eq!(ensure_canonical(&bad_date), Err(AppError::validation("invalid date")));

        let loose_time = NewEvent { time: "9:30".to_string(), ..good.clone() };
        assert_eq!(ensure_canonical(&loose_time), Err(AppError::validation("invalid time")));

        let wrong_slug = NewEvent { slug: "NOT A SLUG".to_string(), ..good.clone() };
        assert_eq!(
            ensure_canonical(&wrong_slug),
            Err(AppError::validation("slug does not match title"))
        );

        let padded = NewEvent { venue: " Hall ".to_string(), ..good.clone() };
        assert!(ensure_canonical(&padded).is_err());

        let no_agenda = NewEvent { agenda: vec![], ..good };
        assert!(ensure_canonical(&no_agenda).is_err());
    }
}
