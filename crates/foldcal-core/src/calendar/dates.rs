//! Week and month date sets on a Monday-first calendar.
//!
//! Both sets are computed purely from the anchor date. `today()` exists for
//! highlighting and never feeds into either set.

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of days in a calendar row.
pub const DAYS_PER_WEEK: usize = 7;

/// The seven dates, Monday through Sunday, of the week containing an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekSet {
    dates: [NaiveDate; DAYS_PER_WEEK],
}

impl WeekSet {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Monday of the week.
    pub fn start(&self) -> NaiveDate {
        self.dates[0]
    }

    /// Sunday of the week.
    pub fn end(&self) -> NaiveDate {
        self.dates[DAYS_PER_WEEK - 1]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start() <= date && date <= self.end()
    }

    pub fn len(&self) -> usize {
        DAYS_PER_WEEK
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Whole Monday-first weeks covering every day of the anchor's month.
///
/// Leading and trailing weeks may include days of the adjacent months; use
/// [`MonthSet::in_month`] to tell them apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthSet {
    year: i32,
    month: u32,
    dates: Vec<NaiveDate>,
}

impl MonthSet {
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of 7-day rows in the grid.
    pub fn row_count(&self) -> usize {
        self.dates.len().div_ceil(DAYS_PER_WEEK)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[NaiveDate]> {
        self.dates.chunks(DAYS_PER_WEEK)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.dates.first(), self.dates.last()) {
            (Some(first), Some(last)) => *first <= date && date <= *last,
            _ => false,
        }
    }

    /// Whether `date` belongs to the month this grid was built for.
    pub fn in_month(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Earliest anchor whose week and month grids fit in chrono's date range.
pub fn min_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(NaiveDate::MIN.year() + 1, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Latest anchor whose week and month grids fit in chrono's date range.
pub fn max_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(NaiveDate::MAX.year() - 1, 12, 31).unwrap_or(NaiveDate::MAX)
}

fn clamp_supported(date: NaiveDate) -> NaiveDate {
    date.clamp(min_supported_date(), max_supported_date())
}

/// The Monday on or before `date`.
///
/// Sunday counts as the seventh day of the week, so a Sunday backs up six days.
/// Saturates at `NaiveDate::MIN`.
pub fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday();
    date.checked_sub_days(Days::new(u64::from(offset))).unwrap_or(NaiveDate::MIN)
}

/// First calendar day of `date`'s month.
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last calendar day of `date`'s month.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_day_of_month(date);
    match first.checked_add_months(chrono::Months::new(1)) {
        Some(next_first) => next_first.pred_opt().unwrap_or(NaiveDate::MAX),
        None => NaiveDate::MAX,
    }
}

/// The week (Monday through Sunday) containing `anchor`.
///
/// Anchors outside [`min_supported_date`]..=[`max_supported_date`] are
/// clamped to the nearest end first.
pub fn week_of(anchor: NaiveDate) -> WeekSet {
    let monday = monday_on_or_before(clamp_supported(anchor));
    let mut dates = [monday; DAYS_PER_WEEK];
    for (slot, date) in dates.iter_mut().zip(monday.iter_days()) {
        *slot = date;
    }
    WeekSet { dates }
}

/// The calendar grid for `anchor`'s month.
///
/// Walks 7-day blocks from the Monday on or before the first of the month and
/// keeps every block that has at least one day inside the month, stopping once
/// a block starts after the month's last day. Out-of-range anchors are
/// clamped as in [`week_of`].
pub fn month_of(anchor: NaiveDate) -> MonthSet {
    let anchor = clamp_supported(anchor);
    let first = first_day_of_month(anchor);
    let last = last_day_of_month(anchor);
    let (year, month) = (anchor.year(), anchor.month());

    let mut dates = Vec::with_capacity(DAYS_PER_WEEK * 6);
    let mut block_start = monday_on_or_before(first);
    while block_start <= last {
        let block = week_of(block_start);
        let touches_month = block
            .dates()
            .iter()
            .any(|d| d.year() == year && d.month() == month);
        if touches_month {
            dates.extend_from_slice(block.dates());
        }
        match block_start.checked_add_days(Days::new(DAYS_PER_WEEK as u64)) {
            Some(next) => block_start = next,
            None => break,
        }
    }

    MonthSet { year, month, dates }
}

/// The local calendar date right now.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` date supplied by a host.
///
/// Dates outside the supported range are rejected rather than clamped.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidDate {
            input: input.to_string(),
        }
    })?;
    let (min, max) = (min_supported_date(), max_supported_date());
    if date < min || date > max {
        return Err(ValidationError::OutOfRange {
            field: "year".into(),
            value: f64::from(date.year()),
            min: f64::from(min.year()),
            max: f64::from(max.year()),
        });
    }
    Ok(date)
}
