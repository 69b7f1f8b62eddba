use clap::Args;
use foldcal_core::calendar::today;
use foldcal_core::{parse_date, CalendarWidget, Config};

#[derive(Args)]
pub struct ViewArgs {
    /// Anchor date (YYYY-MM-DD)
    date: String,
    /// Expansion progress, 0 = week strip, 1 = month grid
    #[arg(long, default_value = "0")]
    progress: f64,
    /// Date to treat as today for highlighting (defaults to the local date)
    #[arg(long)]
    today: Option<String>,
}

pub fn run(args: ViewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let anchor = parse_date(&args.date)?;
    let today = match args.today {
        Some(raw) => parse_date(&raw)?,
        None => today(),
    };
    let config = Config::load()?;
    let widget = CalendarWidget::with_progress(config, anchor, args.progress);
    println!("{}", serde_json::to_string_pretty(&widget.view(today))?);
    Ok(())
}
