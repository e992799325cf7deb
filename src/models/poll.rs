use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::date::DateToken;

/// Opaque remote identifier of a poll date (the `data-dateid` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateId(pub String);

impl fmt::Display for DateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque remote identifier of a participant (the `data-userid` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single vote cell on the poll page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    Yes,
    No,
    Maybe,
    Undecided,
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Vote::Yes => "yes",
            Vote::No => "no",
            Vote::Maybe => "maybe",
            Vote::Undecided => "undecided",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: UserId,
    pub name: String,
    /// One vote per poll date, in display order. May run short when the
    /// page omits trailing cells; missing cells count as undecided.
    pub votes: Vec<Vote>,
}

/// Point-in-time read of the remote poll: dates (with their remote ids) in
/// display order, plus the participant rows. Built fresh for every
/// top-level operation and never cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollSnapshot {
    dates: Vec<(DateToken, DateId)>,
    participants: Vec<Participant>,
}

impl PollSnapshot {
    pub fn new(dates: Vec<(DateToken, DateId)>, participants: Vec<Participant>) -> Self {
        PollSnapshot {
            dates,
            participants,
        }
    }

    pub fn dates(&self) -> &[(DateToken, DateId)] {
        &self.dates
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn date_count(&self) -> usize {
        self.dates.len()
    }

    pub fn contains_date(&self, date: &DateToken) -> bool {
        self.dates.iter().any(|(d, _)| d == date)
    }

    pub fn id_for(&self, date: &DateToken) -> Option<&DateId> {
        self.dates
            .iter()
            .find(|(d, _)| d == date)
            .map(|(_, id)| id)
    }

    /// Remote date ids in display order.
    pub fn date_ids(&self) -> Vec<DateId> {
        self.dates.iter().map(|(_, id)| id.clone()).collect()
    }
}

/// The minimal set of mutations that moves a snapshot to a desired date
/// set. `to_remove` keeps the snapshot's display order; the planner
/// guarantees it never empties the poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationPlan {
    pub to_add: Vec<DateToken>,
    pub to_remove: Vec<(DateToken, DateId)>,
}

impl ReconciliationPlan {
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Vote counts for one poll date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTally {
    pub date: DateToken,
    pub yes: u32,
    pub no: u32,
    pub maybe: u32,
    pub undecided: u32,
}

impl fmt::Display for DateTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: yes {}, no {}, maybe {}, undecided {}",
            self.date, self.yes, self.no, self.maybe, self.undecided
        )
    }
}

/// One participant's votes, paired with the date each vote belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserVotes {
    pub name: String,
    pub votes: Vec<(DateToken, Vote)>,
}

/// Result of a single remote mutation attempt.
#[derive(Debug, Clone, Serialize)]
pub struct OperationOutcome {
    pub target: String,
    pub succeeded: bool,
    pub message: String,
}
