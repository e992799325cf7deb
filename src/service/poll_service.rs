use crate::clients::poll_client::{PollApi, XoyondoClient};
use crate::error::PollError;
use crate::models::date::SpecItem;
use crate::models::poll::{DateId, DateTally, PollSnapshot, UserVotes, Vote};
use crate::service::message_log::MessageLog;
use crate::service::{date_spec, executor, index_resolver, reconcile};

/// Orchestration facade the Discord handler and the CLI call into.
///
/// Every operation re-fetches the poll (nothing is cached between calls),
/// validates all input before the first remote mutation, and returns the
/// full ordered message trail describing what happened.
pub struct PollService<A: PollApi> {
    api: A,
}

impl<A: PollApi> PollService<A> {
    pub fn new(api: A) -> Self {
        PollService { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Adds every date in `expression` to the poll. Positional indices are
    /// rejected here: an index names an existing date, additions name new
    /// ones.
    pub async fn add_dates(&self, expression: &str) -> Result<Vec<String>, PollError> {
        let log = MessageLog::new();
        let spec = date_spec::parse(expression, &log)?;
        let dates = spec.literal_dates()?;
        executor::execute_adds(&self.api, &dates, &log).await;
        Ok(log.into_messages())
    }

    /// Deletes the dates selected by `expression` (literal dates and/or
    /// positional indices against the current display order). The poll
    /// always keeps at least one date: deletion is refused outright when
    /// only one remains, and a delete-everything request spares the last
    /// date in display order.
    pub async fn delete_dates(&self, expression: &str) -> Result<Vec<String>, PollError> {
        let log = MessageLog::new();
        let snapshot = self.api.fetch_snapshot().await?;

        if snapshot.date_count() <= 1 {
            log.push("Deletion not possible as there is only one date left.");
            return Ok(log.into_messages());
        }

        let spec = date_spec::parse(expression, &log)?;
        let ids = snapshot.date_ids();
        let mut targets: Vec<DateId> = Vec::new();
        for item in spec.iter() {
            let id = match item {
                SpecItem::Index(index) => Some(index_resolver::resolve_one(*index, &ids)?.clone()),
                SpecItem::Date(date) => match snapshot.id_for(date) {
                    Some(id) => Some(id.clone()),
                    None => {
                        log.push(format!("Invalid date: {}", date));
                        None
                    }
                },
            };
            if let Some(id) = id {
                if !targets.contains(&id) {
                    targets.push(id);
                }
            }
        }

        if targets.len() >= snapshot.date_count() {
            if let Some((kept_date, kept_id)) = snapshot.dates().last() {
                targets.retain(|id| id != kept_id);
                log.push(format!(
                    "Date {} was kept: the poll must retain at least one date.",
                    kept_date
                ));
            }
        }

        executor::execute_deletes(&self.api, &targets, &log).await;
        Ok(log.into_messages())
    }

    /// Resets the poll to exactly the dates in `expression`: missing dates
    /// are added, surplus dates removed (adds strictly before deletes, so
    /// the at-least-one-date floor cannot be hit mid-sequence), then every
    /// participant is purged regardless of whether the date set changed.
    pub async fn reset_poll(&self, expression: &str) -> Result<Vec<String>, PollError> {
        let log = MessageLog::new();
        let snapshot = self.api.fetch_snapshot().await?;

        let spec = date_spec::parse(expression, &log)?;
        let desired = spec.literal_dates()?;
        let plan = reconcile::plan(&desired, &snapshot, &log);

        executor::execute_adds(&self.api, &plan.to_add, &log).await;
        let remove_ids: Vec<DateId> = plan.to_remove.iter().map(|(_, id)| id.clone()).collect();
        executor::execute_deletes(&self.api, &remove_ids, &log).await;

        let users: Vec<_> = snapshot
            .participants()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        executor::purge_participants(&self.api, &users, &log).await;

        Ok(log.into_messages())
    }

    /// Removes every participant currently registered on the poll.
    pub async fn purge_users(&self) -> Result<Vec<String>, PollError> {
        let log = MessageLog::new();
        let snapshot = self.api.fetch_snapshot().await?;

        if snapshot.participants().is_empty() {
            log.push("Deletion not possible as there is no user registered.");
            return Ok(log.into_messages());
        }

        let users: Vec<_> = snapshot
            .participants()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        executor::purge_participants(&self.api, &users, &log).await;
        Ok(log.into_messages())
    }

    /// Per-date vote tallies, in display order, optionally narrowed by a
    /// date/index expression (in which case the expression's order wins).
    /// Repeated indices are not collapsed here; a caller asking twice gets
    /// the repeat back and can see their mistake.
    pub async fn votes_by_date(
        &self,
        expression: Option<&str>,
    ) -> Result<(Vec<DateTally>, Vec<String>), PollError> {
        let log = MessageLog::new();
        let snapshot = self.api.fetch_snapshot().await?;
        let all = tally_snapshot(&snapshot);

        let selected = match expression {
            None => all,
            Some(expression) => {
                let spec = date_spec::parse(expression, &log)?;
                let mut out = Vec::with_capacity(spec.len());
                for item in spec.iter() {
                    match item {
                        SpecItem::Index(index) => {
                            out.push(index_resolver::resolve_one(*index, &all)?.clone());
                        }
                        SpecItem::Date(date) => match all.iter().find(|t| t.date == *date) {
                            Some(tally) => out.push(tally.clone()),
                            None => log.push(format!("Invalid date: {}", date)),
                        },
                    }
                }
                out
            }
        };

        Ok((selected, log.into_messages()))
    }

    /// Every participant's per-date votes, optionally filtered by a
    /// case-insensitive name match.
    pub async fn votes_by_user(
        &self,
        name: Option<&str>,
    ) -> Result<(Vec<UserVotes>, Vec<String>), PollError> {
        let log = MessageLog::new();
        let snapshot = self.api.fetch_snapshot().await?;

        let wanted = name.map(str::to_lowercase);
        let mut out = Vec::new();
        for participant in snapshot.participants() {
            if let Some(wanted) = &wanted {
                if !participant.name.to_lowercase().contains(wanted.as_str()) {
                    continue;
                }
            }
            let votes = snapshot
                .dates()
                .iter()
                .enumerate()
                .map(|(position, (date, _))| {
                    let vote = participant
                        .votes
                        .get(position)
                        .copied()
                        .unwrap_or(Vote::Undecided);
                    (*date, vote)
                })
                .collect();
            out.push(UserVotes {
                name: participant.name.clone(),
                votes,
            });
        }

        if let Some(name) = name {
            if out.is_empty() {
                log.push(format!("No participant named {}.", name));
            }
        }

        Ok((out, log.into_messages()))
    }
}

impl PollService<XoyondoClient> {
    /// Swaps the managed poll for another one; fails without side effects
    /// when the URL does not match the expected shape.
    pub fn set_url(&mut self, url: &str) -> Result<(), PollError> {
        self.api.set_url(url)
    }

    pub fn url(&self) -> &str {
        self.api.url()
    }
}

/// Counts the vote cells for every date in display order. Participants
/// with fewer cells than dates count as undecided for the missing ones.
fn tally_snapshot(snapshot: &PollSnapshot) -> Vec<DateTally> {
    snapshot
        .dates()
        .iter()
        .enumerate()
        .map(|(position, (date, _))| {
            let mut tally = DateTally {
                date: *date,
                yes: 0,
                no: 0,
                maybe: 0,
                undecided: 0,
            };
            for participant in snapshot.participants() {
                match participant
                    .votes
                    .get(position)
                    .copied()
                    .unwrap_or(Vote::Undecided)
                {
                    Vote::Yes => tally.yes += 1,
                    Vote::No => tally.no += 1,
                    Vote::Maybe => tally.maybe += 1,
                    Vote::Undecided => tally.undecided += 1,
                }
            }
            tally
        })
        .collect()
}
