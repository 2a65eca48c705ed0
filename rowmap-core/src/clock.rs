use time::{Date, Duration, Month, OffsetDateTime};

/// Truncates `instant` to `precision` fractional second digits.
///
/// Precision 0 keeps whole seconds, 9 or more leaves the value untouched.
pub fn limit_time_precision(precision: u8, instant: OffsetDateTime) -> OffsetDateTime {
    if precision >= 9 {
        return instant;
    }
    let step = 10u32.pow(9 - precision as u32);
    let nanos = instant.nanosecond();
    instant - Duration::nanoseconds((nanos % step) as i64)
}

/// Unix milliseconds of `instant`.
pub fn to_unix_millis(instant: OffsetDateTime) -> i64 {
    (instant.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Point in time of unix milliseconds, `None` when out of range.
pub fn from_unix_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000).ok()
}

/// Current time in unix milliseconds.
pub fn now_unix_millis() -> i64 {
    to_unix_millis(OffsetDateTime::now_utc())
}

/// Splits a `yyyymmdd` integer into year, month, day and whether the year is negative.
fn split_date(n: i32) -> (i32, u8, u8, bool) {
    let negative = n < 0;
    let n = n.unsigned_abs();
    ((n / 10_000) as i32, (n / 100 % 100) as u8, (n % 100) as u8, negative)
}

fn calendar_date(year: i32, month: u8, day: u8) -> Option<Date> {
    if !(1..=9999).contains(&year) {
        return None;
    }
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

fn new_date(year: i32, month: u8, day: u8, negative: bool) -> Option<i32> {
    calendar_date(year, month, day)?;
    let n = year * 10_000 + month as i32 * 100 + day as i32;
    Some(if negative { -n } else { n })
}

/// Whether `n` is a valid `yyyymmdd` date. Years run from 1 to 9999, a negative `n`
/// stands for a negative year.
pub fn is_date(n: i32) -> bool {
    let (year, month, day, _) = split_date(n);
    calendar_date(year, month, day).is_some()
}

/// Calendar date of a `yyyymmdd` integer.
pub fn from_date(n: i32) -> Option<Date> {
    let (year, month, day, negative) = split_date(n);
    let date = calendar_date(year, month, day)?;
    if negative {
        return Date::from_calendar_date(-year, date.month(), day).ok();
    }
    Some(date)
}

/// `yyyymmdd` integer of `date`, 0 when the year is out of range.
pub fn to_date(date: Date) -> i32 {
    let year = date.year();
    new_date(year.abs(), date.month() as u8, date.day(), year < 0).unwrap_or_default()
}

/// Today's UTC date as a `yyyymmdd` integer.
pub fn now_date() -> i32 {
    to_date(OffsetDateTime::now_utc().date())
}

/// Reads `y-m-d` or `y/m/d` with up to 4 year digits and up to 2 month and day digits.
/// A leading `-` marks a negative year.
pub fn parse_date(input: &str) -> Option<i32> {
    let (negative, input) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let mut parts = input.split(['-', '/']);
    let mut next = |digits: usize| -> Option<u32> {
        let part = parts.next()?;
        if part.is_empty() || part.len() > digits || !part.bytes().all(|c| c.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    };
    let (year, month, day) = (next(4)?, next(2)?, next(2)?);
    if parts.next().is_some() {
        return None;
    }
    new_date(year as i32, month as u8, day as u8, negative)
}

/// `yyyy-mm-dd` text of a `yyyymmdd` integer.
pub fn format_date(n: i32) -> Option<String> {
    let (year, month, day, negative) = split_date(n);
    calendar_date(year, month, day)?;
    let year = if negative { -year } else { year };
    Some(format!("{year:04}-{month:02}-{day:02}"))
}
