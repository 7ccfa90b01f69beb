use chrono::{Datelike, Duration, NaiveDate};

const WEEKDAYS: [(&str, &str); 7] = [
    ("monday", "mon"),
    ("tuesday", "tue"),
    ("wednesday", "wed"),
    ("thursday", "thu"),
    ("friday", "fri"),
    ("saturday", "sat"),
    ("sunday", "sun"),
];

/// Resolve a user-typed date phrase against `today`.
///
/// Accepts `YYYY-MM-DD`, `today`/`tod`, `tomorrow`/`tom`, and weekday names
/// (full or 3-letter). A weekday resolves to its next occurrence strictly
/// after today; naming today's weekday means next week, never today.
///
/// Returns `None` for anything else. Callers drop the phrase and carry on
/// rather than failing the whole command.
pub fn resolve_date(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = phrase.trim().to_lowercase();

    match s.as_str() {
        "today" | "tod" => return Some(today),
        "tomorrow" | "tom" => return Some(today + Duration::days(1)),
        _ => {}
    }

    for (i, (full, short)) in WEEKDAYS.iter().enumerate() {
        if s == *full || s == *short {
            let current = i64::from(today.weekday().num_days_from_monday());
            let mut delta = (i as i64 - current).rem_euclid(7);
            if delta == 0 {
                delta = 7;
            }
            return Some(today + Duration::days(delta));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}
