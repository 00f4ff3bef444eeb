use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time};
use crate::settings::CountdownPolicy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Whole units left until `target`, all zero once it has passed.
    pub fn until(target: OffsetDateTime, now: OffsetDateTime) -> Self {
        let remaining = target - now;
        if remaining <= Duration::ZERO {
            return Self::default();
        }
        Self {
            days: remaining.whole_days(),
            hours: remaining.whole_hours() % 24,
            minutes: remaining.whole_minutes() % 60,
            seconds: remaining.whole_seconds() % 60,
        }
    }

    pub fn is_over(&self) -> bool {
        *self == Self::default()
    }

    /// Two-digit (or wider, for days) display values.
    pub fn digits(&self) -> [String; 4] {
        [self.days, self.hours, self.minutes, self.seconds].map(|v| format!("{v:02}"))
    }
}

const DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const LOCAL_DATE_TIME: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
const OFFSET_DATE_TIME: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]][offset_hour sign:mandatory][optional [:[offset_minute]]]"
);

/// Parses a stored target. Accepts RFC 3339, the Postgres text form
/// (`2025-12-31 23:59:59+00`), a date-time without offset and a bare
/// `YYYY-MM-DD`. Anything without an offset is taken as UTC.
pub fn parse_target(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    let value = match value.as_bytes().get(10) {
        Some(b' ') => format!("{}T{}", &value[..10], &value[11..]),
        _ => value.to_string(),
    };

    OffsetDateTime::parse(&value, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(&value, OFFSET_DATE_TIME))
        .or_else(|_| PrimitiveDateTime::parse(&value, LOCAL_DATE_TIME).map(PrimitiveDateTime::assume_utc))
        .or_else(|_| Date::parse(&value, DATE).map(|d| d.midnight().assume_utc()))
        .ok()
}

pub fn fallback_target(policy: CountdownPolicy, now: OffsetDateTime) -> OffsetDateTime {
    match policy {
        CountdownPolicy::FixedDate(at) => at,
        CountdownPolicy::MonthsAhead(months) => {
            let date = add_months(now.date(), months);
            let end_of_day = Time::from_hms_milli(23, 59, 59, 999).unwrap_or(Time::MIDNIGHT);
            PrimitiveDateTime::new(date, end_of_day).assume_offset(now.offset())
        }
    }
}

/// Stored value when it parses, otherwise the policy's fallback.
pub fn resolve_target(stored: Option<&str>, policy: CountdownPolicy, now: OffsetDateTime) -> OffsetDateTime {
    match stored.and_then(parse_target) {
        Some(target) => target,
        None => {
            log::info!("countdown target not configured, using fallback {:?}", policy);
            fallback_target(policy, now)
        }
    }
}

/// Calendar month addition; the day is clamped to the target month's length.
fn add_months(date: Date, months: u8) -> Date {
    let zero_based = i32::from(u8::from(date.month())) - 1 + i32::from(months);
    let year = date.year() + zero_based / 12;
    let month = Month::try_from((zero_based % 12 + 1) as u8).unwrap_or(Month::December);
    let day = date.day().min(month.length(year));
    Date::from_calendar_date(year, month, day).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn passed_target_is_all_zero() {
        let now = datetime!(2025-06-01 12:00 UTC);
        for target in [now, now - Duration::seconds(1), now - Duration::days(400)] {
            let c = Countdown::until(target, now);
            assert!(c.is_over());
            assert_eq!(c.digits(), ["00", "00", "00", "00"].map(String::from));
        }
    }

    #[test]
    fn components_are_floored_and_padded() {
        let now = datetime!(2025-06-01 12:00 UTC);
        let target = now + Duration::days(3) + Duration::hours(4) + Duration::minutes(5)
            + Duration::seconds(6) + Duration::milliseconds(999);
        let c = Countdown::until(target, now);
        assert_eq!(c, Countdown { days: 3, hours: 4, minutes: 5, seconds: 6 });
        assert_eq!(c.digits(), ["03", "04", "05", "06"].map(String::from));

        let far = Countdown::until(now + Duration::days(120), now);
        assert_eq!(far.digits()[0], "120");
    }

    #[test]
    fn stored_value_wins() {
        let now = datetime!(2025-06-01 12:00 UTC);
        let policy = CountdownPolicy::MonthsAhead(3);
        assert_eq!(
            resolve_target(Some("2025-09-10T18:00:00Z"), policy, now),
            datetime!(2025-09-10 18:00 UTC)
        );
        assert_eq!(resolve_target(Some("2025-09-10"), policy, now), datetime!(2025-09-10 0:00 UTC));
    }

    #[test]
    fn stored_value_formats() {
        let end_of_year = datetime!(2025-12-31 23:59:59 UTC);
        for value in [
            "2025-12-31T23:59:59Z",
            "2025-12-31T23:59:59.000Z",
            "2025-12-31 23:59:59+00",
            "2025-12-31 23:59:59+00:00",
            "2025-12-31T23:59:59",
            "2025-12-31 23:59:59",
            " 2025-12-31T23:59:59 ",
        ] {
            assert_eq!(parse_target(value), Some(end_of_year), "{value}");
        }
        assert_eq!(parse_target("2025-12-31 23:59:59.5+00"), Some(end_of_year + Duration::milliseconds(500)));
        assert_eq!(parse_target("2025-12-31 20:00:00-03"), Some(datetime!(2025-12-31 23:00 UTC)));
        assert_eq!(parse_target("2025-12-31T23:59:59+03:00"), Some(datetime!(2025-12-31 20:59:59 UTC)));
        assert_eq!(parse_target("31/12/2025"), None);

        let now = datetime!(2025-06-01 12:00 UTC);
        assert_eq!(
            resolve_target(Some("2025-12-31 23:59:59+00"), CountdownPolicy::MonthsAhead(3), now),
            end_of_year
        );
    }

    #[test]
    fn fallback_policies() {
        let now = datetime!(2025-11-30 08:00 UTC);
        assert_eq!(
            resolve_target(None, CountdownPolicy::MonthsAhead(3), now),
            datetime!(2026-02-28 23:59:59.999 UTC)
        );
        assert_eq!(
            resolve_target(Some("not a date"), CountdownPolicy::FixedDate(datetime!(2025-12-31 0:00 UTC)), now),
            datetime!(2025-12-31 0:00 UTC)
        );
    }
}
