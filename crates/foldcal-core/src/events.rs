use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the engine produces an Event.
/// Hosts render from snapshots and may log or forward events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Host supplied a new anchor; week and month sets were recomputed.
    AnchorChanged {
        anchor: NaiveDate,
        week_start: NaiveDate,
        month_rows: usize,
        at: DateTime<Utc>,
    },
    /// A pointer went down on the handle and the tracker captured it.
    DragStarted {
        pointer_id: u64,
        progress: f64,
        /// A pending settle from the previous release was cancelled.
        superseded_settle: bool,
        at: DateTime<Utc>,
    },
    DragMoved {
        delta_y: f64,
        progress: f64,
    },
    /// Pointer released, cancelled or left the surface; a settle is pending.
    DragReleased {
        progress: f64,
        settle_at_ms: u64,
        at: DateTime<Utc>,
    },
    /// The settle timer fired and the snap rule was applied.
    Settled {
        from: f64,
        to: f64,
        at: DateTime<Utc>,
    },
    DateSelected {
        date: NaiveDate,
        at: DateTime<Utc>,
    },
    ProfileClicked {
        at: DateTime<Utc>,
    },
}
