use std::collections::HashSet;

use crate::models::date::DateToken;
use crate::models::poll::{PollSnapshot, ReconciliationPlan};
use crate::service::message_log::MessageLog;

/// Computes the add/remove sets that move `snapshot` to the `desired` date
/// set.
///
/// `to_add` keeps the desired order (duplicates collapsed), `to_remove`
/// keeps the snapshot's display order. The remote system refuses to hold a
/// poll with zero dates, so if the plan would remove everything the last
/// date in display order is exempted and a warning is logged.
pub fn plan(desired: &[DateToken], snapshot: &PollSnapshot, log: &MessageLog) -> ReconciliationPlan {
    let mut seen: HashSet<DateToken> = HashSet::new();
    let mut to_add = Vec::new();
    for date in desired {
        if seen.insert(*date) && !snapshot.contains_date(date) {
            to_add.push(*date);
        }
    }

    let desired_set: HashSet<DateToken> = desired.iter().copied().collect();
    let mut to_remove: Vec<_> = snapshot
        .dates()
        .iter()
        .filter(|(date, _)| !desired_set.contains(date))
        .cloned()
        .collect();

    if !to_remove.is_empty() && snapshot.date_count() - to_remove.len() < 1 {
        if let Some((kept, _)) = to_remove.pop() {
            log.push(format!(
                "Date {} was kept: the poll must retain at least one date.",
                kept
            ));
        }
    }

    ReconciliationPlan { to_add, to_remove }
}
