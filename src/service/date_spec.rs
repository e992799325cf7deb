use crate::error::PollError;
use crate::models::date::{DateSpec, DateToken, SpecItem};
use crate::service::message_log::MessageLog;

/// Parses a free-form date/index expression into a [`DateSpec`].
///
/// Grammar: comma-separated parts. A part is one of
/// - a literal `YYYY/MM/DD` date,
/// - a bare signed integer (a positional index, resolved later against the
///   poll's current date list),
/// - `start:end` where both endpoints are integers (expanded to the
///   inclusive index span) or both are literal dates (expanded day by day).
///
/// Ranges must be ascending. Anything else fails the whole parse; no
/// partial spec is ever returned. Duplicates collapse to their first
/// occurrence.
pub fn parse(expression: &str, log: &MessageLog) -> Result<DateSpec, PollError> {
    let mut spec = DateSpec::default();

    for part in expression.split(',') {
        let part = part.trim();
        match part.split_once(':') {
            Some((start, end)) => {
                parse_range(start.trim(), end.trim(), part, &mut spec, log)?;
            }
            None => {
                spec.push_unique(parse_single(part)?);
            }
        }
    }

    Ok(spec)
}

fn parse_single(part: &str) -> Result<SpecItem, PollError> {
    if let Ok(index) = part.parse::<i64>() {
        return Ok(SpecItem::Index(index));
    }
    let date: DateToken = part.parse()?;
    Ok(SpecItem::Date(date))
}

fn parse_range(
    start: &str,
    end: &str,
    raw: &str,
    spec: &mut DateSpec,
    log: &MessageLog,
) -> Result<(), PollError> {
    if let (Ok(first), Ok(last)) = (start.parse::<i64>(), end.parse::<i64>()) {
        if first > last {
            return Err(PollError::invalid_date(raw));
        }
        for index in first..=last {
            spec.push_unique(SpecItem::Index(index));
        }
        return Ok(());
    }

    // Not an index pair: both endpoints must be literal dates. A mixed
    // range trips the date parse on the non-date endpoint.
    let first: DateToken = start.parse()?;
    let last: DateToken = end.parse()?;
    if first > last {
        return Err(PollError::invalid_date(raw));
    }
    for date in first.sequence_to(last) {
        spec.push_unique(SpecItem::Date(date));
    }
    log.push(format!("added date range {} to {}", first, last));
    Ok(())
}
