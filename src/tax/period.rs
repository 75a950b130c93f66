//! Monthly SST filing periods and their due dates
//!
//! Each taxable period is one calendar month. The return for a period is due
//! on the 15th of the following month. "Today" is always passed in by the
//! caller; nothing here reads the system clock.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Day of the following month on which a period's return is due
pub const SST_DUE_DAY: u32 = 15;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A monthly filing period
///
/// The month is always 1 to 12. Deserialized periods go through the same
/// check as [`FilingPeriod::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawFilingPeriod")]
pub struct FilingPeriod {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawFilingPeriod {
    year: i32,
    month: u32,
}

impl TryFrom<RawFilingPeriod> for FilingPeriod {
    type Error = TaxError;

    fn try_from(raw: RawFilingPeriod) -> TaxResult<Self> {
        Self::new(raw.year, raw.month)
    }
}

/// First and last calendar day of a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodDates {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A period with all of its dates resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDescriptor {
    pub period: FilingPeriod,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub due_date: NaiveDate,
}

impl PeriodDescriptor {
    pub fn dates(&self) -> PeriodDates {
        PeriodDates {
            start: self.start,
            end: self.end,
        }
    }
}

impl FilingPeriod {
    /// Create a period, rejecting months outside 1 to 12
    pub fn new(year: i32, month: u32) -> TaxResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(TaxError::InvalidPeriod(format!(
                "month {} of {} is not between 1 and 12",
                month, year
            )));
        }
        Ok(Self { year, month })
    }

    /// The period a date falls in
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month, 1 to 12
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following month
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year.saturating_add(1),
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year.saturating_sub(1),
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Months elapsed since the first period chrono can represent
    fn months_since_calendar_start(&self) -> u64 {
        let first = Self::containing(NaiveDate::MIN);
        let index = |p: &Self| i64::from(p.year) * 12 + i64::from(p.month) - 1;
        u64::try_from(index(self) - index(&first)).unwrap_or(0)
    }

    /// First and last day of the month
    pub fn dates(&self) -> TaxResult<PeriodDates> {
        let start = self.first_day()?;
        let end = self
            .next()
            .first_day()?
            .pred_opt()
            .ok_or_else(|| self.out_of_range())?;
        Ok(PeriodDates { start, end })
    }

    /// The 15th of the following month
    pub fn due_date(&self) -> TaxResult<NaiveDate> {
        let next = self.next();
        NaiveDate::from_ymd_opt(next.year, next.month, SST_DUE_DAY)
            .ok_or_else(|| self.out_of_range())
    }

    pub fn describe(&self) -> TaxResult<PeriodDescriptor> {
        let dates = self.dates()?;
        Ok(PeriodDescriptor {
            period: *self,
            start: dates.start,
            end: dates.end,
            due_date: self.due_date()?,
        })
    }

    /// Display label, e.g. `May 2024`
    pub fn label(&self) -> String {
        let name = MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("Unknown");
        format!("{} {}", name, self.year)
    }

    fn first_day(&self) -> TaxResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(|| self.out_of_range())
    }

    fn out_of_range(&self) -> TaxError {
        TaxError::InvalidPeriod(format!(
            "{}-{:02} is outside the supported calendar",
            self.year, self.month
        ))
    }
}

/// First and last calendar day of `month` in `year`
pub fn period_dates(year: i32, month: u32) -> TaxResult<PeriodDates> {
    FilingPeriod::new(year, month)?.dates()
}

/// Due date of the return for `month` in `year`
pub fn due_date(year: i32, month: u32) -> TaxResult<NaiveDate> {
    FilingPeriod::new(year, month)?.due_date()
}

/// The period that should be filed next as of `today`
///
/// Up to and including the 15th the current month is still the open period;
/// from the 16th the next month is.
pub fn next_filing_period(today: NaiveDate) -> FilingPeriod {
    let current = FilingPeriod::containing(today);
    if today.day() <= SST_DUE_DAY {
        current
    } else {
        current.next()
    }
}

/// Calendar days from `today` until `due`; negative when overdue
pub fn days_until_due(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Like [`days_until_due`], ignoring the time of day of `now`
pub fn days_until_due_at(due: NaiveDate, now: NaiveDateTime) -> i64 {
    days_until_due(due, now.date())
}

/// `count` periods walking backward from the reference month, newest first
///
/// Fails when the walk would run past the start of the supported calendar.
pub fn periods_back(
    count: usize,
    ref_year: i32,
    ref_month: u32,
) -> TaxResult<Vec<PeriodDescriptor>> {
    let mut period = FilingPeriod::new(ref_year, ref_month)?;
    if count as u64 > period.months_since_calendar_start() + 1 {
        return Err(TaxError::InvalidPeriod(format!(
            "cannot walk back {} periods from {}",
            count,
            period.label()
        )));
    }

    let mut periods = Vec::with_capacity(count);
    for _ in 0..count {
        periods.push(period.describe()?);
        period = period.previous();
    }
    Ok(periods)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_period_dates_leap_years() {
        assert_eq!(period_dates(2024, 2).unwrap().end, ymd(2024, 2, 29));
        assert_eq!(period_dates(2023, 2).unwrap().end, ymd(2023, 2, 28));
        assert_eq!(period_dates(2000, 2).unwrap().end, ymd(2000, 2, 29));
        assert_eq!(period_dates(1900, 2).unwrap().end, ymd(1900, 2, 28));
    }

    #[test]
    fn test_period_dates_month_lengths() {
        let dates = period_dates(2024, 5).unwrap();
        assert_eq!(dates.start, ymd(2024, 5, 1));
        assert_eq!(dates.end, ymd(2024, 5, 31));

        assert_eq!(period_dates(2024, 4).unwrap().end, ymd(2024, 4, 30));
        assert_eq!(period_dates(2024, 12).unwrap().end, ymd(2024, 12, 31));
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(period_dates(2024, 0), Err(TaxError::InvalidPeriod(_))));
        assert!(matches!(due_date(2024, 13), Err(TaxError::InvalidPeriod(_))));
    }

    #[test]
    fn test_due_date() {
        assert_eq!(due_date(2024, 5).unwrap(), ymd(2024, 6, 15));
        assert_eq!(due_date(2024, 12).unwrap(), ymd(2025, 1, 15));
        assert_eq!(due_date(2024, 1).unwrap(), ymd(2024, 2, 15));
    }

    #[test]
    fn test_next_filing_period_rollover() {
        assert_eq!(
            next_filing_period(ymd(2024, 5, 15)),
            FilingPeriod { year: 2024, month: 5 }
        );
        assert_eq!(
            next_filing_period(ymd(2024, 5, 16)),
            FilingPeriod { year: 2024, month: 6 }
        );
        assert_eq!(
            next_filing_period(ymd(2024, 5, 1)),
            FilingPeriod { year: 2024, month: 5 }
        );
        assert_eq!(
            next_filing_period(ymd(2024, 12, 31)),
            FilingPeriod { year: 2025, month: 1 }
        );
    }

    #[test]
    fn test_days_until_due() {
        let due = ymd(2024, 6, 15);

        assert_eq!(days_until_due(due, ymd(2024, 6, 1)), 14);
        assert_eq!(days_until_due(due, ymd(2024, 6, 15)), 0);
        assert_eq!(days_until_due(due, ymd(2024, 6, 20)), -5);
        assert_eq!(days_until_due(ymd(2025, 1, 15), ymd(2024, 12, 31)), 15);
    }

    #[test]
    fn test_days_until_due_ignores_time_of_day() {
        let due = ymd(2024, 6, 15);
        let late_evening = ymd(2024, 6, 14).and_hms_opt(23, 59, 59).unwrap();
        let early_morning = ymd(2024, 6, 14).and_hms_opt(0, 0, 1).unwrap();

        assert_eq!(days_until_due_at(due, late_evening), 1);
        assert_eq!(days_until_due_at(due, early_morning), 1);
    }

    #[test]
    fn test_periods_back_crosses_year_boundary() {
        let periods = periods_back(4, 2024, 2).unwrap();

        let months: Vec<(i32, u32)> = periods
            .iter()
            .map(|p| (p.period.year(), p.period.month()))
            .collect();
        assert_eq!(months, vec![(2024, 2), (2024, 1), (2023, 12), (2023, 11)]);

        assert_eq!(periods[0].end, ymd(2024, 2, 29));
        assert_eq!(periods[2].start, ymd(2023, 12, 1));
        assert_eq!(periods[2].due_date, ymd(2024, 1, 15));
    }

    #[test]
    fn test_periods_back_empty_and_invalid() {
        assert!(periods_back(0, 2024, 6).unwrap().is_empty());
        assert!(periods_back(3, 2024, 13).is_err());
    }

    #[test]
    fn test_periods_back_past_calendar_start() {
        assert!(matches!(
            periods_back(usize::MAX, 2024, 1),
            Err(TaxError::InvalidPeriod(_))
        ));

        let first = FilingPeriod::containing(NaiveDate::MIN);
        assert!(periods_back(2, first.year(), first.month()).is_err());
        assert_eq!(periods_back(1, first.year(), first.month()).unwrap().len(), 1);
    }

    #[test]
    fn test_deserialize_rejects_invalid_month() {
        let result = serde_json::from_str::<FilingPeriod>(r#"{"year":2024,"month":0}"#);
        assert!(result.is_err());
        assert!(serde_json::from_str::<FilingPeriod>(r#"{"year":2024,"month":13}"#).is_err());

        let period: FilingPeriod = serde_json::from_str(r#"{"year":2024,"month":1}"#).unwrap();
        assert_eq!(period.previous(), FilingPeriod::new(2023, 12).unwrap());
        assert_eq!(serde_json::to_string(&period).unwrap(), r#"{"year":2024,"month":1}"#);
    }

    #[test]
    fn test_next_and_previous_at_year_edges() {
        let december = FilingPeriod::new(2024, 12).unwrap();
        assert_eq!(december.next(), FilingPeriod::new(2025, 1).unwrap());
        assert_eq!(december.next().previous(), december);

        let far_future = FilingPeriod::new(i32::MAX, 12).unwrap();
        assert!(far_future.dates().is_err());
        assert!(far_future.due_date().is_err());
    }

    #[test]
    fn test_label() {
        assert_eq!(FilingPeriod::new(2024, 5).unwrap().label(), "May 2024");
        assert_eq!(FilingPeriod::new(2025, 12).unwrap().label(), "December 2025");
    }

    #[test]
    fn test_contains() {
        let dates = period_dates(2024, 5).unwrap();

        assert!(dates.contains(ymd(2024, 5, 1)));
        assert!(dates.contains(ymd(2024, 5, 31)));
        assert!(!dates.contains(ymd(2024, 6, 1)));
        assert!(!dates.contains(ymd(2024, 4, 30)));
    }
}
