//! Reporting periods used to scope totals, budget progress and series.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;
use crate::utils::dates::{month_end, month_start, shift_month, year_end, year_start};

/// Inclusive calendar-day interval. Both bounds are part of the period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReportingPeriod {
    from: NaiveDate,
    to: NaiveDate,
}

impl ReportingPeriod {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, LedgerError> {
        if to < from {
            return Err(LedgerError::validation(format!(
                "period end {} precedes start {}",
                to, from
            )));
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    pub fn month_of(date: NaiveDate) -> Self {
        Self {
            from: month_start(date),
            to: month_end(date),
        }
    }

    pub fn year_of(date: NaiveDate) -> Self {
        Self {
            from: year_start(date),
            to: year_end(date),
        }
    }

    /// The full calendar month preceding the month `today` falls in.
    pub fn previous_month(today: NaiveDate) -> Self {
        Self::month_of(shift_month(month_start(today), -1))
    }

    /// The last `days` days ending on `today`, both inclusive.
    pub fn trailing_days(today: NaiveDate, days: u32) -> Result<Self, LedgerError> {
        if days == 0 {
            return Err(LedgerError::validation(
                "Trailing period must cover at least one day",
            ));
        }
        let from = today
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or_else(|| {
                LedgerError::validation(format!(
                    "Trailing period of {days} days reaches before the earliest supported date"
                ))
            })?;
        Ok(Self { from, to: today })
    }

    pub fn day_count(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// Either side is unbounded when no period is selected.
pub fn in_period(period: Option<&ReportingPeriod>, date: NaiveDate) -> bool {
    period.map_or(true, |p| p.contains(date))
}

/// Persistable description of a default period, resolved against "today" at session start.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "preset", rename_all = "snake_case")]
pub enum PeriodPreset {
    #[default]
    CurrentYear,
    CurrentMonth,
    TrailingDays {
        days: u32,
    },
    Custom {
        from: NaiveDate,
        to: NaiveDate,
    },
    AllHistory,
}

impl PeriodPreset {
    pub fn resolve(&self, today: NaiveDate) -> Result<Option<ReportingPeriod>, LedgerError> {
        let period = match *self {
            PeriodPreset::CurrentYear => ReportingPeriod::year_of(today),
            PeriodPreset::CurrentMonth => ReportingPeriod::month_of(today),
            PeriodPreset::TrailingDays { days } => ReportingPeriod::trailing_days(today, days)?,
            PeriodPreset::Custom { from, to } => ReportingPeriod::new(from, to)?,
            PeriodPreset::AllHistory => return Ok(None),
        };
        Ok(Some(period))
    }
}

impl From<ReportingPeriod> for PeriodPreset {
    fn from(period: ReportingPeriod) -> Self {
        PeriodPreset::Custom {
            from: period.from,
            to: period.to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bounds_are_inclusive() {
        let period = ReportingPeriod::new(date(2024, 7, 1), date(2024, 7, 31)).unwrap();
        assert!(period.contains(date(2024, 7, 1)));
        assert!(period.contains(date(2024, 7, 31)));
        assert!(!period.contains(date(2024, 8, 1)));
        assert!(!period.contains(date(2024, 6, 30)));
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        let err = ReportingPeriod::new(date(2024, 7, 2), date(2024, 7, 1)).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(ReportingPeriod::new(date(2024, 7, 1), date(2024, 7, 1)).is_ok());
    }

    #[test]
    fn previous_month_crosses_year_boundary() {
        let period = ReportingPeriod::previous_month(date(2025, 1, 18));
        assert_eq!(period.from(), date(2024, 12, 1));
        assert_eq!(period.to(), date(2024, 12, 31));
    }

    #[test]
    fn presets_resolve_against_today() {
        let today = date(2024, 3, 15);
        let year = PeriodPreset::CurrentYear.resolve(today).unwrap().unwrap();
        assert_eq!((year.from(), year.to()), (date(2024, 1, 1), date(2024, 12, 31)));
        let trailing = PeriodPreset::TrailingDays { days: 30 }
            .resolve(today)
            .unwrap()
            .unwrap();
        assert_eq!(trailing.day_count(), 30);
        assert_eq!(trailing.to(), today);
        assert_eq!(PeriodPreset::AllHistory.resolve(today).unwrap(), None);
    }

    #[test]
    fn trailing_days_out_of_range_is_rejected() {
        let today = date(2024, 7, 1);
        for days in [0, u32::MAX] {
            let err = PeriodPreset::TrailingDays { days }.resolve(today).unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)), "days = {days}");
        }
        let single = PeriodPreset::TrailingDays { days: 1 }
            .resolve(today)
            .unwrap()
            .unwrap();
        assert_eq!((single.from(), single.to()), (today, today));
    }
}
