//! Drag gesture tracking: pointer motion in, expansion progress out.

mod tracker;

pub use tracker::{snap, DragPhase, DragState, GestureTracker, PointerId};
