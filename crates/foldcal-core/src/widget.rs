//! Calendar widget shell.
//!
//! Owns the anchor-derived date sets and the gesture tracker, routes pointer
//! input, and reports taps to the host through its callbacks. Rendering is
//! left to the host: [`CalendarWidget::view`] returns a plain snapshot that
//! any UI layer can draw.
//!
//! The host must pass a valid anchor date; the widget does not validate it.

use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{month_of, week_of, MonthSet, WeekSet};
use crate::events::Event;
use crate::gesture::{DragPhase, GestureTracker, PointerId};
use crate::layout::{
    visible_dates, CellContext, CellKind, HandleVisual, InterpolationEngine, Membership,
};
use crate::storage::Config;

type DateCallback = Box<dyn FnMut(NaiveDate)>;
type ProfileCallback = Box<dyn FnMut()>;

/// One drawable date cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub date: NaiveDate,
    pub day: u32,
    pub kind: CellKind,
    pub in_week: bool,
    pub opacity: f64,
    pub scale: f64,
    pub today_marker: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarView {
    pub title: String,
    pub year: i32,
    pub weekday_labels: Vec<String>,
    pub cells: Vec<CellView>,
    pub height: f64,
    pub handle: HandleVisual,
    pub progress: f64,
    pub phase: DragPhase,
    /// False while dragging so the renderer tracks the finger without easing.
    pub animate: bool,
}

pub struct CalendarWidget {
    config: Config,
    anchor: NaiveDate,
    week: WeekSet,
    month: MonthSet,
    tracker: GestureTracker,
    on_date_select: Option<DateCallback>,
    on_profile_click: Option<ProfileCallback>,
}

impl fmt::Debug for CalendarWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarWidget")
            .field("anchor", &self.anchor)
            .field("tracker", &self.tracker)
            .field("on_date_select", &self.on_date_select.is_some())
            .field("on_profile_click", &self.on_profile_click.is_some())
            .finish_non_exhaustive()
    }
}

impl CalendarWidget {
    /// Create a collapsed widget around `anchor`.
    pub fn new(config: Config, anchor: NaiveDate) -> Self {
        Self::with_progress(config, anchor, 0.0)
    }

    /// Create a widget resting at `progress`, e.g. to restore a held partial state.
    pub fn with_progress(config: Config, anchor: NaiveDate, progress: f64) -> Self {
        let tracker = GestureTracker::with_progress(config.gesture.clone(), progress);
        Self {
            config,
            anchor,
            week: week_of(anchor),
            month: month_of(anchor),
            tracker,
            on_date_select: None,
            on_profile_click: None,
        }
    }

    /// Register the host's selection callback.
    pub fn on_date_select(mut self, callback: impl FnMut(NaiveDate) + 'static) -> Self {
        self.on_date_select = Some(Box::new(callback));
        self
    }

    /// Register the host's profile button callback.
    pub fn on_profile_click(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_profile_click = Some(Box::new(callback));
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn week(&self) -> &WeekSet {
        &self.week
    }

    pub fn month(&self) -> &MonthSet {
        &self.month
    }

    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    pub fn progress(&self) -> f64 {
        self.tracker.progress()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn visible_dates(&self) -> Vec<NaiveDate> {
        visible_dates(self.tracker.progress(), &self.week, &self.month)
    }

    pub fn height(&self) -> f64 {
        InterpolationEngine::new(&self.config.layout)
            .container_height(self.tracker.progress(), &self.month)
    }

    /// Snapshot of the calendar as it should be drawn now.
    ///
    /// `today` drives highlighting only; pass [`crate::calendar::today`] in
    /// production.
    pub fn view(&self, today: NaiveDate) -> CalendarView {
        let progress = self.tracker.progress();
        let engine = InterpolationEngine::new(&self.config.layout);
        let ctx = CellContext {
            anchor: self.anchor,
            today,
            progress,
            month: &self.month,
            other_month_threshold: self.config.layout.other_month_threshold,
        };

        let cells = engine
            .cells(progress, &self.week, &self.month)
            .into_iter()
            .map(|cell| CellView {
                date: cell.date,
                day: cell.date.day(),
                kind: ctx.classify(cell.date),
                in_week: cell.membership == Membership::Week,
                opacity: cell.visual.opacity,
                scale: cell.visual.scale,
                today_marker: ctx.today_marker(cell.date),
            })
            .collect();

        CalendarView {
            title: self.config.locale.month_name(self.anchor.month()).to_string(),
            year: self.anchor.year(),
            weekday_labels: self.config.locale.weekday_names.clone(),
            cells,
            height: engine.container_height(progress, &self.month),
            handle: HandleVisual::at(progress),
            progress,
            phase: self.tracker.phase(),
            animate: !self.tracker.is_dragging(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Host-driven re-render. Recomputes the date sets when the anchor moved.
    pub fn render(&mut self, anchor: NaiveDate) -> Option<Event> {
        if anchor == self.anchor {
            return None;
        }
        self.anchor = anchor;
        self.week = week_of(anchor);
        self.month = month_of(anchor);
        tracing::debug!(%anchor, rows = self.month.row_count(), "anchor changed");
        Some(Event::AnchorChanged {
            anchor,
            week_start: self.week.start(),
            month_rows: self.month.row_count(),
            at: Utc::now(),
        })
    }

    /// Forward a tap on a date cell to the host.
    ///
    /// Taps on dates that are not currently visible are dropped. The anchor
    /// is not changed; the host decides whether to re-render with the new date.
    pub fn on_date_tap(&mut self, date: NaiveDate) -> Option<Event> {
        if !self.visible_dates().contains(&date) {
            tracing::trace!(%date, "tap on hidden date ignored");
            return None;
        }
        if let Some(callback) = self.on_date_select.as_mut() {
            callback(date);
        }
        Some(Event::DateSelected {
            date,
            at: Utc::now(),
        })
    }

    pub fn on_profile_tap(&mut self) -> Event {
        if let Some(callback) = self.on_profile_click.as_mut() {
            callback();
        }
        Event::ProfileClicked { at: Utc::now() }
    }

    pub fn pointer_down(&mut self, pointer: PointerId, y: f64) -> Option<Event> {
        self.tracker.pointer_down(pointer, y)
    }

    pub fn pointer_move(&mut self, pointer: PointerId, y: f64) -> Option<Event> {
        self.tracker.pointer_move(pointer, y)
    }

    pub fn pointer_up(&mut self, pointer: PointerId, now_ms: u64) -> Option<Event> {
        self.tracker.pointer_up(pointer, now_ms)
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId, now_ms: u64) -> Option<Event> {
        self.tracker.pointer_cancel(pointer, now_ms)
    }

    pub fn pointer_leave(&mut self, pointer: PointerId, now_ms: u64) -> Option<Event> {
        self.tracker.pointer_leave(pointer, now_ms)
    }

    pub fn interrupt(&mut self, now_ms: u64) -> Option<Event> {
        self.tracker.interrupt(now_ms)
    }

    /// Call from the host's frame or timer loop to let a pending settle fire.
    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        self.tracker.tick(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn widget() -> CalendarWidget {
        CalendarWidget::new(Config::default(), ymd(2024, 1, 19))
    }

    fn expand(widget: &mut CalendarWidget) {
        widget.pointer_down(1, 0.0);
        widget.pointer_move(1, 100.0);
        widget.pointer_up(1, 0);
        widget.tick(50);
    }

    #[test]
    fn starts_collapsed_on_the_anchor_week() {
        let w = widget();
        assert_eq!(w.visible_dates(), w.week().dates());
        assert_eq!(w.height(), 220.0);
        assert_eq!(w.month().len(), 35);
    }

    #[test]
    fn render_recomputes_only_on_change() {
        let mut w = widget();
        assert!(w.render(ymd(2024, 1, 19)).is_none());

        let event = w.render(ymd(2024, 3, 5));
        assert!(matches!(
            event,
            Some(Event::AnchorChanged { week_start, month_rows: 5, .. })
                if week_start == ymd(2024, 3, 4)
        ));
        assert_eq!(w.week().start(), ymd(2024, 3, 4));
        assert_eq!(w.month().month(), 3);
    }

    #[test]
    fn render_keeps_gesture_progress() {
        let mut w = widget();
        expand(&mut w);
        w.render(ymd(2024, 2, 10));
        assert_eq!(w.progress(), 1.0);
        assert_eq!(w.visible_dates(), w.month().dates());
    }

    #[test]
    fn tap_forwards_visible_dates_unchanged() {
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&picked);
        let mut w = widget().on_date_select(move |d| sink.borrow_mut().push(d));

        assert!(w.on_date_tap(ymd(2024, 1, 16)).is_some());
        assert_eq!(*picked.borrow(), vec![ymd(2024, 1, 16)]);
        // Selection does not move the anchor.
        assert_eq!(w.anchor(), ymd(2024, 1, 19));
    }

    #[test]
    fn tap_on_hidden_date_is_dropped() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut w = widget().on_date_select(move |_| counter.set(counter.get() + 1));

        assert!(w.on_date_tap(ymd(2024, 1, 2)).is_none());
        assert_eq!(calls.get(), 0);

        expand(&mut w);
        assert!(w.on_date_tap(ymd(2024, 1, 2)).is_some());
        assert!(w.on_date_tap(ymd(2024, 2, 4)).is_some());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn tap_without_callback_still_reports() {
        let mut w = widget();
        assert!(matches!(
            w.on_date_tap(ymd(2024, 1, 21)),
            Some(Event::DateSelected { .. })
        ));
    }

    #[test]
    fn profile_tap_passes_through() {
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let mut w = widget().on_profile_click(move || counter.set(counter.get() + 1));
        assert!(matches!(w.on_profile_tap(), Event::ProfileClicked { .. }));
        assert!(matches!(w.on_profile_tap(), Event::ProfileClicked { .. }));
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn view_collapsed() {
        let w = widget();
        let view = w.view(ymd(2024, 1, 17));
        assert_eq!(view.title, "Январь");
        assert_eq!(view.year, 2024);
        assert_eq!(view.weekday_labels.len(), 7);
        assert_eq!(view.cells.len(), 7);
        assert_eq!(view.height, 220.0);
        assert!(view.animate);
        assert_eq!(view.phase, DragPhase::Idle);

        let kinds: Vec<_> = view.cells.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                CellKind::Regular,
                CellKind::Regular,
                CellKind::Today,
                CellKind::Future,
                CellKind::Selected,
                CellKind::Future,
                CellKind::Future,
            ]
        );
        assert!(view.cells[2].today_marker);
        assert!(view.cells.iter().all(|c| c.in_week && c.opacity == 1.0));
    }

    #[test]
    fn view_while_dragging_disables_animation() {
        let mut w = widget();
        w.pointer_down(1, 0.0);
        w.pointer_move(1, 50.0);
        let view = w.view(ymd(2030, 1, 1));
        assert!(!view.animate);
        assert_eq!(view.phase, DragPhase::Dragging);
        assert_eq!(view.cells.len(), 7 + 14);
        assert_eq!(view.height, 325.0);
        assert!(view.cells.iter().any(|c| c.opacity < 1.0));
    }

    #[test]
    fn view_expanded_flags_other_month_days() {
        let mut w = widget();
        expand(&mut w);
        let view = w.view(ymd(2030, 1, 1));
        assert_eq!(view.cells.len(), 35);
        assert_eq!(view.height, 430.0);
        let feb_4 = view.cells.last().unwrap();
        assert_eq!(feb_4.day, 4);
        assert_eq!(feb_4.kind, CellKind::OtherMonth);
        assert!(!feb_4.in_week);
        assert_eq!(feb_4.opacity, 1.0);
    }

    #[test]
    fn stray_pointer_events_are_harmless() {
        let mut w = widget();
        assert!(w.pointer_up(9, 0).is_none());
        assert!(w.pointer_move(9, 300.0).is_none());
        assert!(w.tick(10_000).is_none());
        assert_eq!(w.progress(), 0.0);
    }
}
