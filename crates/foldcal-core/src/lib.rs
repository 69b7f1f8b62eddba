//! # foldcal Core Library
//!
//! The engine behind a drag-to-expand calendar header: a week strip that
//! morphs into a full month grid as the user pulls a handle. It is purely
//! in-memory and renderer-agnostic; hosts feed it pointer events and a clock,
//! and draw whatever snapshot it hands back.
//!
//! ## Architecture
//!
//! - **Calendar**: Monday-first week and month date sets for an anchor date
//! - **Gesture**: A state machine turning pointer motion into expansion
//!   progress, with snap-on-release after a short settle delay
//! - **Layout**: Pure interpolation from progress to visible dates, per-cell
//!   opacity/scale and container height
//! - **Widget**: The shell that wires the three together and talks to the host
//!
//! ## Key Components
//!
//! - [`CalendarWidget`]: Host-facing shell
//! - [`GestureTracker`]: Drag state machine
//! - [`InterpolationEngine`]: Cell visuals and container height
//! - [`Config`]: Tuning constants, persisted as TOML

pub mod calendar;
pub mod error;
pub mod events;
pub mod gesture;
pub mod layout;
pub mod storage;
pub mod widget;

pub use calendar::{month_of, parse_date, week_of, MonthSet, WeekSet};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use gesture::{DragPhase, DragState, GestureTracker, PointerId};
pub use layout::{CellKind, CellVisual, HandleVisual, InterpolationEngine, Membership};
pub use storage::{Config, GestureConfig, LayoutConfig, LocaleConfig};
pub use widget::{CalendarView, CalendarWidget, CellView};
