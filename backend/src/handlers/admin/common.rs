use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::{
    error::AppError,
    models::activity_log::{ActivityAction, ActorRole},
    utils::time::{end_of_local_day, start_of_local_day},
};

/// Trimmed value, with empty strings and `all` treated as "no filter".
pub fn normalize_filter(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
}

pub fn parse_role_filter(value: Option<String>) -> Result<Option<ActorRole>, AppError> {
    normalize_filter(value)
        .map(|value| value.parse::<ActorRole>())
        .transpose()
        .map_err(AppError::from)
}

pub fn parse_action_filter(value: Option<String>) -> Result<Option<ActivityAction>, AppError> {
    normalize_filter(value)
        .map(|value| ActivityAction::from_stored(&value))
        .transpose()
        .map_err(AppError::from)
}

/// RFC3339 instants are taken as-is. Zone-less datetimes are wall-clock time
/// in `tz`. Bare dates expand to the first (start) or last (end) instant of
/// that calendar day in `tz`.
pub fn parse_datetime_value(value: &str, is_start: bool, tz: &Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return tz
            .from_local_datetime(&dt)
            .earliest()
            .map(|local| local.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(if is_start {
        start_of_local_day(date, tz)
    } else {
        end_of_local_day(date, tz)
    })
}

pub fn parse_bound(
    raw: Option<String>,
    is_start: bool,
    name: &str,
    tz: &Tz,
) -> Result<Option<DateTime<Utc>>, AppError> {
    match raw.filter(|value| !value.trim().is_empty()) {
        Some(value) => parse_datetime_value(&value, is_start, tz)
            .map(Some)
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "`{name}` must be a valid datetime (RFC3339 or YYYY-MM-DD)"
                ))
            }),
        None => Ok(None),
    }
}
