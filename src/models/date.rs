use chrono::{Days, NaiveDate};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::PollError;

/// Canonical text form used by the poll page and by user input.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// A day-granularity calendar date, rendered as `YYYY/MM/DD` everywhere the
/// user or the remote poll sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateToken(NaiveDate);

impl DateToken {
    pub fn new(date: NaiveDate) -> Self {
        DateToken(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Every date from `self` to `end`, inclusive, in day steps.
    /// Returns an empty sequence when `end` is before `self`.
    pub fn sequence_to(self, end: DateToken) -> Vec<DateToken> {
        let mut out = Vec::new();
        let mut current = self.0;
        while current <= end.0 {
            out.push(DateToken(current));
            match current.checked_add_days(Days::new(1)) {
                Some(next) => current = next,
                None => break,
            }
        }
        out
    }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for DateToken {
    type Err = PollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(DateToken)
            .map_err(|_| PollError::invalid_date(s))
    }
}

impl Serialize for DateToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// One resolved element of a parsed date expression: either a literal date
/// or a positional index into the poll's current date list (negative counts
/// from the end).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecItem {
    Date(DateToken),
    Index(i64),
}

impl fmt::Display for SpecItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecItem::Date(date) => write!(f, "{}", date),
            SpecItem::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A parsed date expression: ordered, duplicate-free.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSpec {
    items: Vec<SpecItem>,
}

impl DateSpec {
    pub fn push_unique(&mut self, item: SpecItem) {
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    pub fn items(&self) -> &[SpecItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpecItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_indices(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, SpecItem::Index(_)))
    }

    /// All items as literal dates. Fails if the spec contains positional
    /// indices, which only make sense against an existing date list.
    pub fn literal_dates(&self) -> Result<Vec<DateToken>, PollError> {
        let mut dates = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match item {
                SpecItem::Date(date) => dates.push(*date),
                SpecItem::Index(index) => {
                    return Err(PollError::invalid_date(index.to_string()));
                }
            }
        }
        Ok(dates)
    }
}
