use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use thiserror::Error;

/// Six full weeks, enough for any month regardless of its first weekday.
pub const GRID_DAYS: usize = 42;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const MONTH_NAMES: [&str; 12] = [
    "Januar", "Februar", "Mart", "April", "Maj", "Jun",
    "Jul", "Avgust", "Septembar", "Oktobar", "Novembar", "Decembar",
];

const MONTH_SHORT_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "maj", "jun",
    "jul", "avg", "sep", "okt", "nov", "dec",
];

/// Indexed 0 = Monday .. 6 = Sunday.
const DAY_NAMES: [&str; 7] = ["Pon", "Uto", "Sre", "Čet", "Pet", "Sub", "Ned"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Invalid date '{input}', expected YYYY-MM-DD")]
    Format { input: String },
    #[error("Invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("Day index {0} out of range 0..=6")]
    DayIndexOutOfRange(usize),
}

/// Builds the 42-day grid for a month, starting on the Monday on or before the 1st.
pub fn month_grid(year: i32, month: u32) -> Result<Vec<NaiveDate>, DateError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(DateError::InvalidMonth { year, month })?;

    let offset = first.weekday().num_days_from_monday() as u64;
    let start = first
        .checked_sub_days(Days::new(offset))
        .ok_or(DateError::InvalidMonth { year, month })?;

    let days: Vec<NaiveDate> = start.iter_days().take(GRID_DAYS).collect();
    if days.len() != GRID_DAYS {
        return Err(DateError::InvalidMonth { year, month });
    }

    Ok(days)
}

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

pub fn month_short_name(date: NaiveDate) -> &'static str {
    MONTH_SHORT_NAMES[date.month0() as usize]
}

/// Header label such as `Jun 2024`.
pub fn month_label(year: i32, month: u32) -> Result<String, DateError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(DateError::InvalidMonth { year, month })?;
    Ok(format!("{} {}", month_name(first), year))
}

pub fn day_name(index: usize) -> Result<&'static str, DateError> {
    DAY_NAMES
        .get(index)
        .copied()
        .ok_or(DateError::DayIndexOutOfRange(index))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn is_today(date: NaiveDate, today: NaiveDate) -> bool {
    date == today
}

pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Accepts only the zero-padded `YYYY-MM-DD` form so that formatting the
/// result reproduces the input exactly.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateError> {
    let format_error = || DateError::Format { input: input.to_string() };

    let bytes = input.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !well_shaped {
        return Err(format_error());
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| format_error())
}

/// Shifts a (year, month) pair by `delta` months.
pub fn add_months(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) + delta;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}
