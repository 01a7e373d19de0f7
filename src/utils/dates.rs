//! Calendar-day helpers. Everything here works on `NaiveDate`; there is no
//! time-of-day or timezone component anywhere in the ledger.

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::errors::LedgerError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(raw: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        LedgerError::validation(format!(
            "Invalid date `{}`, expected YYYY-MM-DD",
            raw.trim()
        ))
    })
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 12 {
        return 31;
    }
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .map(|first_next| (first_next - Duration::days(1)).day())
        .unwrap_or(28)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    let last = days_in_month(date.year(), date.month());
    date.with_day(last).unwrap_or(date)
}

pub fn year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

pub fn year_end(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

/// Moves `date` by whole months, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

pub fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    shift_month(date, years * 12)
}

/// First day of every calendar month touching `[from, to]`, oldest first.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    if to < from {
        return months;
    }
    let last = month_start(to);
    let mut cursor = month_start(from);
    while cursor <= last {
        months.push(cursor);
        // Stops at the last month the calendar can represent.
        match cursor.checked_add_months(Months::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    months
}

pub fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}
