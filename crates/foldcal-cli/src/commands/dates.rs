use chrono::NaiveDate;
use foldcal_core::{month_of, parse_date, week_of};

pub fn week(date: &str) -> Result<(), Box<dyn std::error::Error>> {
    let week = week_of(parse_date(date)?);
    println!("{}", serde_json::to_string_pretty(week.dates())?);
    Ok(())
}

pub fn month(date: &str) -> Result<(), Box<dyn std::error::Error>> {
    let month = month_of(parse_date(date)?);
    let rows: Vec<&[NaiveDate]> = month.rows().collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
