use chrono::NaiveDate;
use events_core::validation::{canonicalize_date, canonicalize_time, slugify};
use proptest::prelude::*;

fn is_canonical_date(s: &str) -> bool {
    s.len() == 10
        && s.chars().enumerate().all(|(idx, ch)| match idx {
            4 | 7 => ch == '-',
            _ => ch.is_ascii_digit(),
        })
}

proptest! {
    /// Property: slugify(slugify(s)) == slugify(s)
    #[test]
    fn prop_slugify_is_idempotent(title in ".*") {
        let once = slugify(&title);
        prop_assert_eq!(slugify(&once), once);
    }

    /// Property: slug contains only [a-z0-9_-], no edge or doubled hyphens
    #[test]
    fn prop_slug_shape(title in ".*") {
        let slug = slugify(&title);
        prop_assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'));
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }

    /// Property: valid calendar dates come back as YYYY-MM-DD of the same day
    #[test]
    fn prop_date_canonical_round_trip(
        year in 1000i32..=9999,
        month in 1u32..=12,
        day in 1u32..=31,
        format in prop::sample::select(vec!["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%d %B %Y"]),
    ) {
        let date = NaiveDate::from_ymd_opt(year, month, day);
        prop_assume!(date.is_some());
        let date = date.unwrap();

        let canonical = canonicalize_date(&date.format(format).to_string()).unwrap();

        prop_assert!(is_canonical_date(&canonical));
        prop_assert_eq!(NaiveDate::parse_from_str(&canonical, "%Y-%m-%d").unwrap(), date);
    }

    /// Property: canonical dates are a fixed point
    #[test]
    fn prop_canonical_date_is_fixed_point(days in 0i64..3_000_000) {
        let date = NaiveDate::from_ymd_opt(1, 1, 1).unwrap() + chrono::Duration::days(days);
        prop_assume!(date.format("%Y").to_string().len() == 4);

        let canonical = date.format("%Y-%m-%d").to_string();
        prop_assert_eq!(canonicalize_date(&canonical).unwrap(), canonical);
    }

    /// Property: any in-range H:MM is accepted and zero-padded
    #[test]
    fn prop_valid_time_is_padded(hour in 0u32..24, minute in 0u32..60) {
        let canonical = canonicalize_time(&format!("{hour}:{minute:02}")).unwrap();
        let expected = format!("{hour:02}:{minute:02}");
        prop_assert_eq!(canonical, expected);
    }

    /// Property: hours 24+ are rejected
    #[test]
    fn prop_out_of_range_hour_is_rejected(hour in 24u32..100, minute in 0u32..60) {
        let result = canonicalize_time(&format!("{hour}:{minute:02}"));
        prop_assert!(result.is_err());
    }

    /// Property: single-digit minutes never match the pattern
    #[test]
    fn prop_single_digit_minute_is_rejected(hour in 0u32..24, minute in 0u32..10) {
        let result = canonicalize_time(&format!("{hour}:{minute}"));
        prop_assert!(result.is_err());
    }
}
