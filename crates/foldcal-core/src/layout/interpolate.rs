//! Week-to-month interpolation.
//!
//! Everything here is a pure function of `(progress, WeekSet, MonthSet)` and
//! the layout tuning. Nothing is animated over time; a renderer asks again
//! whenever progress changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{MonthSet, WeekSet};
use crate::storage::LayoutConfig;

/// Opacity and scale of one date cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellVisual {
    pub opacity: f64,
    pub scale: f64,
}

impl CellVisual {
    pub const OPAQUE: CellVisual = CellVisual {
        opacity: 1.0,
        scale: 1.0,
    };
}

/// Why a date is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    /// Part of the anchor's week strip; always fully shown.
    Week,
    /// Revealed from the month grid as the calendar expands.
    MonthOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleCell {
    pub date: NaiveDate,
    pub membership: Membership,
    pub visual: CellVisual,
}

/// Month dates outside the week, in month order.
pub fn additional_dates(week: &WeekSet, month: &MonthSet) -> Vec<NaiveDate> {
    month
        .dates()
        .iter()
        .copied()
        .filter(|d| !week.contains(*d))
        .collect()
}

/// How many additional month dates are revealed at `progress`.
pub fn revealed_count(progress: f64, week: &WeekSet, month: &MonthSet) -> usize {
    let spare = month.len().saturating_sub(week.len());
    (spare as f64 * progress.clamp(0.0, 1.0)).floor() as usize
}

/// Dates to draw at `progress`, in draw order.
///
/// Exactly the week at 0, exactly the month grid at 1, otherwise the week
/// followed by the first revealed month dates.
pub fn visible_dates(progress: f64, week: &WeekSet, month: &MonthSet) -> Vec<NaiveDate> {
    if progress <= 0.0 {
        return week.dates().to_vec();
    }
    if progress >= 1.0 {
        return month.dates().to_vec();
    }
    let revealed = revealed_count(progress, week, month);
    let mut dates = week.dates().to_vec();
    dates.extend(additional_dates(week, month).into_iter().take(revealed));
    dates
}

/// Stateless calculator for cell visuals and container height.
#[derive(Debug, Clone, Copy)]
pub struct InterpolationEngine<'a> {
    config: &'a LayoutConfig,
}

impl<'a> InterpolationEngine<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Visual for the additional date at `position` when `revealed` are shown.
    ///
    /// Cells near the reveal edge fade and shrink; the band is
    /// `fade_band_ratio` of the revealed count, at least one cell wide.
    /// Positions at or past the edge are hidden.
    pub fn fade(&self, progress: f64, position: usize, revealed: usize) -> CellVisual {
        if progress >= 1.0 {
            return CellVisual::OPAQUE;
        }
        if position >= revealed {
            return CellVisual {
                opacity: 0.0,
                scale: self.config.min_cell_scale,
            };
        }
        let band = (revealed as f64 * self.config.fade_band_ratio).max(1.0);
        let opacity = ((revealed - position) as f64 / band).min(1.0);
        let scale = if opacity < 1.0 {
            self.config.min_cell_scale + opacity * (1.0 - self.config.min_cell_scale)
        } else {
            1.0
        };
        CellVisual { opacity, scale }
    }

    /// Visible dates with their membership and visual state.
    pub fn cells(&self, progress: f64, week: &WeekSet, month: &MonthSet) -> Vec<VisibleCell> {
        let revealed = revealed_count(progress, week, month);
        let mut position = 0;
        visible_dates(progress, week, month)
            .into_iter()
            .map(|date| {
                if week.contains(date) {
                    VisibleCell {
                        date,
                        membership: Membership::Week,
                        visual: CellVisual::OPAQUE,
                    }
                } else {
                    let visual = self.fade(progress, position, revealed);
                    position += 1;
                    VisibleCell {
                        date,
                        membership: Membership::MonthOnly,
                        visual,
                    }
                }
            })
            .collect()
    }

    /// Container height, linear between collapsed and the month's expanded height.
    pub fn container_height(&self, progress: f64, month: &MonthSet) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        let base = self.config.base_height;
        let expanded = self.config.expanded_height(month.row_count());
        base + (expanded - base) * progress
    }
}
