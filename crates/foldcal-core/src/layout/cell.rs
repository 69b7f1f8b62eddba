//! Per-cell highlighting and the drag handle's look.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::MonthSet;

/// Highlight class of a date cell. The first matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// The anchor date.
    Selected,
    Today,
    /// Tomorrow or later.
    Future,
    /// Outside the anchor's month, once the grid is open far enough to show it.
    OtherMonth,
    Regular,
}

/// Inputs shared by every cell of one render.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub anchor: NaiveDate,
    pub today: NaiveDate,
    pub progress: f64,
    pub month: &'a MonthSet,
    pub other_month_threshold: f64,
}

impl CellContext<'_> {
    pub fn classify(&self, date: NaiveDate) -> CellKind {
        if date == self.anchor {
            CellKind::Selected
        } else if date == self.today {
            CellKind::Today
        } else if self.is_future(date) {
            CellKind::Future
        } else if !self.month.in_month(date) && self.progress > self.other_month_threshold {
            CellKind::OtherMonth
        } else {
            CellKind::Regular
        }
    }

    /// Today's dot is drawn unless the selection highlight already covers it.
    pub fn today_marker(&self, date: NaiveDate) -> bool {
        date == self.today && date != self.anchor
    }

    fn is_future(&self, date: NaiveDate) -> bool {
        match self.today.checked_add_days(Days::new(1)) {
            Some(tomorrow) => date >= tomorrow,
            None => false,
        }
    }
}

/// Transform of the drag handle pill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleVisual {
    pub scale_x: f64,
    pub scale_y: f64,
    pub alpha: f64,
}

impl HandleVisual {
    /// The handle stretches and brightens as the calendar opens.
    pub fn at(progress: f64) -> Self {
        let p = progress.clamp(0.0, 1.0);
        Self {
            scale_x: 1.0 + p * 0.2,
            scale_y: 1.0 + p * 0.5,
            alpha: 0.4 + p * 0.4,
        }
    }
}
