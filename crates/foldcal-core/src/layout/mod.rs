//! Derived layout: which dates are visible, how each cell looks, and how tall
//! the calendar is at a given expansion progress.

mod cell;
mod interpolate;

pub use cell::{CellContext, CellKind, HandleVisual};
pub use interpolate::{
    additional_dates, revealed_count, visible_dates, CellVisual, InterpolationEngine, Membership,
    VisibleCell,
};
