//! Calendar date math: the week strip and the month grid for an anchor date.

mod dates;

pub use dates::{
    first_day_of_month, last_day_of_month, max_supported_date, min_supported_date,
    monday_on_or_before, month_of, parse_date, today, week_of, MonthSet, WeekSet, DAYS_PER_WEEK,
};
