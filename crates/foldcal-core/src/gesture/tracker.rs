//! Drag gesture tracker.
//!
//! Turns vertical pointer motion on the calendar handle into an expansion
//! progress in `[0, 1]`. Like every other state machine in this crate it owns
//! no threads or timers: the caller forwards pointer events and calls
//! `tick()` with the current time so a pending settle can fire.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Dragging -> Settling -> Idle
//!            ^           |
//!            +-----------+   (pointer-down before the settle fires)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut tracker = GestureTracker::new(GestureConfig::default());
//! tracker.pointer_down(0, 120.0);
//! tracker.pointer_move(0, 170.0);
//! tracker.pointer_up(0, now_ms);
//! // Later, from the host's frame or timer callback:
//! tracker.tick(now_ms + 50); // Returns Some(Event::Settled { .. })
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::storage::GestureConfig;

/// Identifier the host assigns to a pointer or touch point.
pub type PointerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragPhase {
    /// At rest: fully collapsed, fully expanded, or held part-way.
    Idle,
    /// A pointer is down and moving.
    Dragging,
    /// Pointer released; the snap rule runs once the settle delay elapses.
    Settling,
}

/// Everything the tracker remembers between events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub phase: DragPhase,
    /// 0.0 = week strip, 1.0 = full month grid.
    pub progress: f64,
    pub last_pointer_y: f64,
}

impl Default for DragState {
    fn default() -> Self {
        Self {
            phase: DragPhase::Idle,
            progress: 0.0,
            last_pointer_y: 0.0,
        }
    }
}

/// Snap rule applied when a settle fires.
///
/// Below `low` collapses to 0, above `high` expands to 1, anything in between
/// is kept as a deliberate partial hold.
pub fn snap(progress: f64, low: f64, high: f64) -> f64 {
    if progress < low {
        0.0
    } else if progress > high {
        1.0
    } else {
        progress
    }
}

/// Gesture state machine for the calendar handle.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    config: GestureConfig,
    state: DragState,
    /// The single pointer this gesture follows; others are ignored.
    active_pointer: Option<PointerId>,
    /// When the pending settle fires (ms, caller's clock). Only set while Settling.
    settle_deadline_ms: Option<u64>,
}

impl GestureTracker {
    /// Create a collapsed tracker.
    pub fn new(config: GestureConfig) -> Self {
        Self::with_progress(config, 0.0)
    }

    /// Create an idle tracker resting at `progress` (clamped to `[0, 1]`).
    pub fn with_progress(config: GestureConfig, progress: f64) -> Self {
        Self {
            config,
            state: DragState {
                progress: clamp_unit(progress),
                ..DragState::default()
            },
            active_pointer: None,
            settle_deadline_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn phase(&self) -> DragPhase {
        self.state.phase
    }

    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    pub fn is_dragging(&self) -> bool {
        self.state.phase == DragPhase::Dragging
    }

    pub fn active_pointer(&self) -> Option<PointerId> {
        self.active_pointer
    }

    pub fn settle_deadline_ms(&self) -> Option<u64> {
        self.settle_deadline_ms
    }

    /// Whether move/up events should be routed here regardless of where the
    /// pointer is. Held from pointer-down until the settle completes.
    pub fn has_capture(&self) -> bool {
        self.state.phase != DragPhase::Idle
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a drag. Ignored while another pointer is dragging.
    ///
    /// A pending settle is cancelled so it cannot overwrite the new drag.
    /// A press with a non-finite `y` is ignored.
    pub fn pointer_down(&mut self, pointer: PointerId, y: f64) -> Option<Event> {
        if !y.is_finite() {
            return None;
        }
        match self.state.phase {
            DragPhase::Dragging => {
                tracing::trace!(pointer, active = ?self.active_pointer, "ignoring extra pointer");
                None
            }
            DragPhase::Idle | DragPhase::Settling => {
                let superseded_settle = self.settle_deadline_ms.take().is_some();
                if superseded_settle {
                    tracing::debug!(
                        progress = self.state.progress,
                        "pending settle superseded by new drag"
                    );
                }
                self.state.phase = DragPhase::Dragging;
                self.state.last_pointer_y = y;
                self.active_pointer = Some(pointer);
                tracing::debug!(pointer, progress = self.state.progress, "drag started");
                Some(Event::DragStarted {
                    pointer_id: pointer,
                    progress: self.state.progress,
                    superseded_settle,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Apply a move of the active pointer. Stray moves are ignored.
    pub fn pointer_move(&mut self, pointer: PointerId, y: f64) -> Option<Event> {
        if !self.is_dragging() || self.active_pointer != Some(pointer) || !y.is_finite() {
            return None;
        }
        let delta_y = y - self.state.last_pointer_y;
        self.state.progress =
            clamp_unit(self.state.progress + delta_y / self.config.max_drag_distance);
        self.state.last_pointer_y = y;
        tracing::trace!(delta_y, progress = self.state.progress, "drag moved");
        Some(Event::DragMoved {
            delta_y,
            progress: self.state.progress,
        })
    }

    /// Release the active pointer and schedule the settle.
    ///
    /// An up without a matching down (or from another pointer) is a no-op.
    pub fn pointer_up(&mut self, pointer: PointerId, now_ms: u64) -> Option<Event> {
        if self.active_pointer != Some(pointer) {
            return None;
        }
        self.release(now_ms)
    }

    /// Platform cancelled the active pointer. Same path as release.
    pub fn pointer_cancel(&mut self, pointer: PointerId, now_ms: u64) -> Option<Event> {
        self.pointer_up(pointer, now_ms)
    }

    /// Active pointer left the tracking surface. Same path as release.
    pub fn pointer_leave(&mut self, pointer: PointerId, now_ms: u64) -> Option<Event> {
        self.pointer_up(pointer, now_ms)
    }

    /// Another gesture source took over mid-drag; release whichever pointer is active.
    pub fn interrupt(&mut self, now_ms: u64) -> Option<Event> {
        self.release(now_ms)
    }

    /// Call periodically. Returns `Some(Event::Settled)` when the settle fires.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        match (self.state.phase, self.settle_deadline_ms) {
            (DragPhase::Settling, Some(deadline)) if now_ms >= deadline => {
                let from = self.state.progress;
                let to = snap(from, self.config.snap_low, self.config.snap_high);
                self.state.progress = to;
                self.state.phase = DragPhase::Idle;
                self.settle_deadline_ms = None;
                tracing::debug!(from, to, "drag settled");
                Some(Event::Settled {
                    from,
                    to,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn release(&mut self, now_ms: u64) -> Option<Event> {
        if !self.is_dragging() {
            return None;
        }
        let settle_at_ms = now_ms.saturating_add(self.config.settle_delay_ms);
        self.state.phase = DragPhase::Settling;
        self.active_pointer = None;
        self.settle_deadline_ms = Some(settle_at_ms);
        tracing::debug!(progress = self.state.progress, settle_at_ms, "drag released");
        Some(Event::DragReleased {
            progress: self.state.progress,
            settle_at_ms,
            at: Utc::now(),
        })
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tracker() -> GestureTracker {
        GestureTracker::new(GestureConfig::default())
    }

    /// Drag pointer 1 from y=0 through `ys`, release at t=0 and let the settle fire.
    fn drag_and_settle(tracker: &mut GestureTracker, ys: &[f64]) -> f64 {
        tracker.pointer_down(1, 0.0);
        for &y in ys {
            tracker.pointer_move(1, y);
        }
        tracker.pointer_up(1, 0);
        tracker.tick(50);
        tracker.progress()
    }

    #[test]
    fn down_move_up_settle_cycle() {
        let mut t = tracker();
        assert_eq!(t.phase(), DragPhase::Idle);
        assert!(!t.has_capture());

        assert!(t.pointer_down(7, 10.0).is_some());
        assert_eq!(t.phase(), DragPhase::Dragging);
        assert_eq!(t.active_pointer(), Some(7));
        assert!(t.has_capture());

        assert!(t.pointer_move(7, 50.0).is_some());
        assert!((t.progress() - 0.4).abs() < 1e-9);
        assert_eq!(t.state().last_pointer_y, 50.0);

        assert!(t.pointer_up(7, 1_000).is_some());
        assert_eq!(t.phase(), DragPhase::Settling);
        assert_eq!(t.settle_deadline_ms(), Some(1_050));
        assert!(t.has_capture());

        assert!(t.tick(1_049).is_none());
        assert_eq!(t.phase(), DragPhase::Settling);

        let settled = t.tick(1_050);
        assert!(matches!(settled, Some(Event::Settled { to, .. }) if (to - 0.4).abs() < 1e-9));
        assert_eq!(t.phase(), DragPhase::Idle);
        assert!(!t.has_capture());
    }

    #[test]
    fn half_drag_holds_between_thresholds() {
        let mut t = tracker();
        let settled = drag_and_settle(&mut t, &[25.0, 50.0]);
        assert_eq!(settled, 0.5);
    }

    #[test]
    fn drag_past_high_threshold_expands_fully() {
        let mut t = tracker();
        assert_eq!(drag_and_settle(&mut t, &[40.0, 80.0]), 1.0);
    }

    #[test]
    fn short_drag_collapses() {
        let mut t = tracker();
        assert_eq!(drag_and_settle(&mut t, &[29.0]), 0.0);
    }

    #[test]
    fn upward_drag_collapses_from_expanded() {
        let mut t = GestureTracker::with_progress(GestureConfig::default(), 1.0);
        assert_eq!(drag_and_settle(&mut t, &[-40.0, -80.0]), 0.0);
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(snap(0.3, 0.3, 0.7), 0.3);
        assert_eq!(snap(0.7, 0.3, 0.7), 0.7);
        assert_eq!(snap(0.2999, 0.3, 0.7), 0.0);
        assert_eq!(snap(0.7001, 0.3, 0.7), 1.0);
    }

    #[test]
    fn progress_persists_across_gestures() {
        let mut t = tracker();
        drag_and_settle(&mut t, &[50.0]);
        // Second drag continues from the held 0.5.
        assert_eq!(drag_and_settle(&mut t, &[30.0]), 1.0);
    }

    #[test]
    fn moves_outside_a_drag_are_ignored() {
        let mut t = tracker();
        assert!(t.pointer_move(1, 500.0).is_none());
        assert_eq!(t.progress(), 0.0);

        t.pointer_down(1, 0.0);
        t.pointer_up(1, 0);
        assert!(t.pointer_move(1, 500.0).is_none());
        assert_eq!(t.progress(), 0.0);
    }

    #[test]
    fn up_without_down_is_a_noop() {
        let mut t = tracker();
        assert!(t.pointer_up(1, 0).is_none());
        assert!(t.pointer_cancel(1, 0).is_none());
        assert!(t.interrupt(0).is_none());
        assert_eq!(t.state(), DragState::default());
    }

    #[test]
    fn second_pointer_is_ignored() {
        let mut t = tracker();
        t.pointer_down(1, 0.0);
        assert!(t.pointer_down(2, 0.0).is_none());
        assert!(t.pointer_move(2, 90.0).is_none());
        assert!(t.pointer_up(2, 0).is_none());
        assert_eq!(t.phase(), DragPhase::Dragging);
        assert_eq!(t.active_pointer(), Some(1));

        t.pointer_move(1, 20.0);
        assert!((t.progress() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn cancel_and_leave_take_the_release_path() {
        let mut t = tracker();
        t.pointer_down(1, 0.0);
        t.pointer_move(1, 80.0);
        assert!(matches!(t.pointer_cancel(1, 0), Some(Event::DragReleased { .. })));
        t.tick(50);
        assert_eq!(t.progress(), 1.0);

        let mut t = tracker();
        t.pointer_down(1, 0.0);
        t.pointer_move(1, 10.0);
        assert!(t.pointer_leave(1, 0).is_some());
        assert_eq!(t.phase(), DragPhase::Settling);
        t.tick(50);
        assert_eq!(t.progress(), 0.0);
    }

    #[test]
    fn interrupt_releases_active_pointer() {
        let mut t = tracker();
        t.pointer_down(3, 0.0);
        t.pointer_move(3, 90.0);
        assert!(t.interrupt(100).is_some());
        assert_eq!(t.active_pointer(), None);
        assert_eq!(t.settle_deadline_ms(), Some(150));
    }

    #[test]
    fn new_drag_supersedes_pending_settle() {
        let mut t = tracker();
        t.pointer_down(1, 0.0);
        t.pointer_move(1, 10.0);
        t.pointer_up(1, 0);

        let started = t.pointer_down(1, 10.0);
        assert!(matches!(
            started,
            Some(Event::DragStarted { superseded_settle: true, .. })
        ));
        assert_eq!(t.settle_deadline_ms(), None);

        // The stale settle would have collapsed to 0; it must not fire mid-drag.
        assert!(t.tick(1_000).is_none());
        assert!((t.progress() - 0.1).abs() < 1e-9);
        assert_eq!(t.phase(), DragPhase::Dragging);
    }

    #[test]
    fn non_finite_coordinates_are_ignored() {
        let mut t = tracker();
        t.pointer_down(1, 0.0);
        assert!(t.pointer_move(1, f64::NAN).is_none());
        assert!(t.pointer_move(1, f64::INFINITY).is_none());
        assert_eq!(t.progress(), 0.0);
        assert_eq!(t.state().last_pointer_y, 0.0);
    }

    #[test]
    fn non_finite_press_leaves_state_alone() {
        let mut t = GestureTracker::with_progress(GestureConfig::default(), 1.0);
        assert!(t.pointer_down(1, f64::NAN).is_none());
        assert_eq!(t.phase(), DragPhase::Idle);
        assert!(!t.has_capture());
        assert!(t.pointer_move(1, 5.0).is_none());
        assert_eq!(t.progress(), 1.0);

        t.pointer_up(1, 0);
        t.pointer_down(1, 40.0);
        t.pointer_up(1, 0);
        assert_eq!(t.settle_deadline_ms(), Some(50));
        assert!(t.pointer_down(2, f64::NEG_INFINITY).is_none());
        assert_eq!(t.settle_deadline_ms(), Some(50));
        assert_eq!(t.phase(), DragPhase::Settling);
    }

    #[test]
    fn with_progress_clamps() {
        let start = |p| GestureTracker::with_progress(GestureConfig::default(), p).progress();
        assert_eq!(start(4.0), 1.0);
        assert_eq!(start(-1.0), 0.0);
        assert_eq!(start(f64::NAN), 0.0);
    }

    proptest! {
        #[test]
        fn progress_stays_in_unit_interval(
            start in 0.0f64..=1.0,
            ys in proptest::collection::vec(-10_000.0f64..10_000.0, 0..40),
        ) {
            let mut t = GestureTracker::with_progress(GestureConfig::default(), start);
            t.pointer_down(1, 0.0);
            for y in ys {
                t.pointer_move(1, y);
                prop_assert!((0.0..=1.0).contains(&t.progress()));
            }
        }

        #[test]
        fn settle_snaps_outside_the_band(start in 0.0f64..=1.0, y in -200.0f64..200.0) {
            let mut t = GestureTracker::with_progress(GestureConfig::default(), start);
            t.pointer_down(1, 0.0);
            t.pointer_move(1, y);
            let before = t.progress();
            t.pointer_up(1, 0);
            t.tick(u64::MAX);
            let after = t.progress();
            if before < 0.3 {
                prop_assert_eq!(after, 0.0);
            } else if before > 0.7 {
                prop_assert_eq!(after, 1.0);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }
}
