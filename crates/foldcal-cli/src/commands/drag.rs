use clap::Args;
use foldcal_core::{parse_date, CalendarWidget, Config, Event};
use serde::Serialize;

const POINTER: u64 = 0;

#[derive(Args)]
pub struct DragArgs {
    /// Anchor date (YYYY-MM-DD)
    date: String,
    /// Pointer y positions after the press at y=0, comma-separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    moves: Vec<f64>,
    /// Progress before the drag starts
    #[arg(long, default_value = "0")]
    from: f64,
}

#[derive(Serialize)]
struct DragReport {
    events: Vec<Event>,
    progress: f64,
    visible_count: usize,
    height: f64,
}

/// Press at y=0, move through each position, release at t=0 and let the
/// settle delay elapse.
pub fn run(args: DragArgs) -> Result<(), Box<dyn std::error::Error>> {
    let anchor = parse_date(&args.date)?;
    let config = Config::load()?;
    let settle_delay_ms = config.gesture.settle_delay_ms;
    let mut widget = CalendarWidget::with_progress(config, anchor, args.from);

    let mut events = Vec::new();
    events.extend(widget.pointer_down(POINTER, 0.0));
    for y in args.moves {
        events.extend(widget.pointer_move(POINTER, y));
    }
    events.extend(widget.pointer_up(POINTER, 0));
    events.extend(widget.tick(settle_delay_ms));

    let report = DragReport {
        events,
        progress: widget.progress(),
        visible_count: widget.visible_dates().len(),
        height: widget.height(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
