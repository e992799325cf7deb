use futures::stream::{self, StreamExt};

use crate::clients::poll_client::PollApi;
use crate::models::date::DateToken;
use crate::models::poll::{DateId, OperationOutcome, UserId};
use crate::service::message_log::MessageLog;

/// Upper bound on in-flight remote mutations within one batch. The remote
/// host imposes no protocol limit, so this is purely a politeness cap.
pub const MAX_IN_FLIGHT: usize = 16;

/// Adds every date as an independent remote mutation, at most
/// [`MAX_IN_FLIGHT`] in flight at once. All requests are joined before
/// returning; one failure never aborts its siblings. Each outcome lands in
/// the log as exactly one line, in completion order.
pub async fn execute_adds<A: PollApi + ?Sized>(
    api: &A,
    dates: &[DateToken],
    log: &MessageLog,
) -> Vec<OperationOutcome> {
    // Materialize the futures before streaming; mapping inside the stream
    // trips rust-lang/rust#102211 ("`Send` is not general enough") once the
    // result is awaited behind an `async_trait` handler.
    let futures: Vec<_> = dates
        .iter()
        .map(|date| async move {
            let outcome = match api.add_date(date).await {
                Ok(()) => OperationOutcome {
                    target: date.to_string(),
                    succeeded: true,
                    message: format!("Successfully added date {}", date),
                },
                Err(err) => OperationOutcome {
                    target: date.to_string(),
                    succeeded: false,
                    message: format!("Failed to add date {}: {}", date, err),
                },
            };
            log.push(outcome.message.clone());
            outcome
        })
        .collect();
    stream::iter(futures)
        .buffer_unordered(MAX_IN_FLIGHT)
        .collect()
        .await
}

/// Deletes every date id; same fan-out/fan-in contract as
/// [`execute_adds`].
pub async fn execute_deletes<A: PollApi + ?Sized>(
    api: &A,
    ids: &[DateId],
    log: &MessageLog,
) -> Vec<OperationOutcome> {
    // See note in `execute_adds` about rust-lang/rust#102211.
    let futures: Vec<_> = ids
        .iter()
        .map(|id| async move {
            let outcome = match api.delete_date(id).await {
                Ok(()) => OperationOutcome {
                    target: id.to_string(),
                    succeeded: true,
                    message: format!("Successfully deleted date with ID {}", id),
                },
                Err(err) => OperationOutcome {
                    target: id.to_string(),
                    succeeded: false,
                    message: format!("Failed to delete date with ID {}: {}", id, err),
                },
            };
            log.push(outcome.message.clone());
            outcome
        })
        .collect();
    stream::iter(futures)
        .buffer_unordered(MAX_IN_FLIGHT)
        .collect()
        .await
}

/// Removes every listed participant; same fan-out/fan-in contract as
/// [`execute_adds`].
pub async fn purge_participants<A: PollApi + ?Sized>(
    api: &A,
    users: &[UserId],
    log: &MessageLog,
) -> Vec<OperationOutcome> {
    // See note in `execute_adds` about rust-lang/rust#102211.
    let futures: Vec<_> = users
        .iter()
        .map(|user| async move {
            let outcome = match api.delete_user(user).await {
                Ok(()) => OperationOutcome {
                    target: user.to_string(),
                    succeeded: true,
                    message: format!("Successfully deleted user with ID {}", user),
                },
                Err(err) => OperationOutcome {
                    target: user.to_string(),
                    succeeded: false,
                    message: format!("Failed to delete user with ID {}: {}", user, err),
                },
            };
            log.push(outcome.message.clone());
            outcome
        })
        .collect();
    stream::iter(futures)
        .buffer_unordered(MAX_IN_FLIGHT)
        .collect()
        .await
}
