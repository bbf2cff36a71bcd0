use crate::error::{Result, ScrapeError};
use chrono::{Duration, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse the date part of a vlr.gg timestamp such as `2024-06-18 14:00:00`
pub fn parse_match_date(value: &str) -> Result<NaiveDate> {
    let date = value.split(' ').next().unwrap_or_default();
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|source| ScrapeError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// Go back `days` days from `date`, formatted `YYYY-MM-DD`. Any time of day
/// after the date is ignored.
pub fn travel_back_in_time(date: &str, days: i64) -> Result<String> {
    let date = parse_match_date(date)?;
    Ok(format_date(date - Duration::days(days)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
