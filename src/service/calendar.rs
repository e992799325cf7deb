use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::error::PollError;
use crate::models::date::DateToken;
use crate::service::message_log::MessageLog;

/// Turns a `YYYY/WW` ISO-week expression into a `start:end` date-range
/// expression covering Monday through Sunday of that week.
pub fn week_range(week: &str, log: &MessageLog) -> Result<String, PollError> {
    let (year, number) = split_period(week)?;
    let monday = NaiveDate::from_isoywd_opt(year, number, Weekday::Mon)
        .ok_or_else(|| PollError::invalid_date(week))?;
    let sunday = monday + Days::new(6);
    let range = format!("{}:{}", DateToken::new(monday), DateToken::new(sunday));
    log.push(format!("{} corresponds to {}", week, range));
    Ok(range)
}

/// Turns a `YYYY/MM` expression into a `start:end` date-range expression
/// covering the first through the last day of that month.
pub fn month_range(month: &str, log: &MessageLog) -> Result<String, PollError> {
    let (year, number) = split_period(month)?;
    let first = NaiveDate::from_ymd_opt(year, number, 1)
        .ok_or_else(|| PollError::invalid_date(month))?;
    let next_month = if number == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, number + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| PollError::invalid_date(month))?;
    let range = format!("{}:{}", DateToken::new(first), DateToken::new(last));
    log.push(format!("{} corresponds to {}", month, range));
    Ok(range)
}

/// `YYYY/WW` for the ISO week `offset` whole weeks away from `today`.
pub fn current_week(today: NaiveDate, offset: i64) -> String {
    let day = shift(today, 7 * offset);
    let iso = day.iso_week();
    format!("{}/{}", iso.year(), iso.week())
}

/// `YYYY/MM` roughly `offset` months away from `today`. Uses 30-day
/// strides, so around month boundaries large offsets may drift by a month.
pub fn current_month(today: NaiveDate, offset: i64) -> String {
    let day = shift(today, 30 * offset);
    format!("{}/{}", day.year(), day.month())
}

fn shift(today: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        today.checked_add_days(Days::new(days as u64))
    } else {
        today.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(today)
}

fn split_period(raw: &str) -> Result<(i32, u32), PollError> {
    let Some((year, number)) = raw.split_once('/') else {
        return Err(PollError::invalid_date(raw));
    };
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| PollError::invalid_date(raw))?;
    let number: u32 = number
        .trim()
        .parse()
        .map_err(|_| PollError::invalid_date(raw))?;
    Ok((year, number))
}
