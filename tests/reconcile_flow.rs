use pollBot::models::date::DateToken;
use pollBot::models::poll::{DateId, PollSnapshot};
use pollBot::service::message_log::MessageLog;
use pollBot::service::reconcile;

fn date(s: &str) -> DateToken {
    s.parse().unwrap()
}

fn snapshot(dates: &[(&str, &str)]) -> PollSnapshot {
    let dates = dates
        .iter()
        .map(|(d, id)| (date(d), DateId(id.to_string())))
        .collect();
    PollSnapshot::new(dates, Vec::new())
}

#[test]
fn matching_sets_yield_a_noop_plan() {
    let snap = snapshot(&[("2024/05/01", "1"), ("2024/05/02", "2")]);
    let log = MessageLog::new();
    let plan = reconcile::plan(&[date("2024/05/01"), date("2024/05/02")], &snap, &log);
    assert!(plan.is_noop());
    assert!(log.is_empty());
}

#[test]
fn diff_splits_into_adds_and_removes() {
    // snapshot A,B,C in display order; desired B,D
    let snap = snapshot(&[("2024/05/01", "a"), ("2024/05/02", "b"), ("2024/05/03", "c")]);
    let log = MessageLog::new();
    let plan = reconcile::plan(&[date("2024/05/02"), date("2024/05/09")], &snap, &log);

    assert_eq!(plan.to_add, vec![date("2024/05/09")]);
    let removed: Vec<String> = plan.to_remove.iter().map(|(_, id)| id.0.clone()).collect();
    assert_eq!(removed, vec!["a", "c"]);
}

#[test]
fn to_add_keeps_desired_order_without_duplicates() {
    let snap = snapshot(&[("2024/05/01", "a")]);
    let log = MessageLog::new();
    let desired = [
        date("2024/05/05"),
        date("2024/05/03"),
        date("2024/05/05"),
        date("2024/05/01"),
    ];
    let plan = reconcile::plan(&desired, &snap, &log);
    assert_eq!(plan.to_add, vec![date("2024/05/05"), date("2024/05/03")]);
    assert!(plan.to_remove.is_empty());
}

#[test]
fn plan_never_removes_every_date() {
    let snap = snapshot(&[("2024/05/01", "a"), ("2024/05/02", "b")]);
    let log = MessageLog::new();
    // desired set disjoint from the snapshot: naive diff would drop both
    let plan = reconcile::plan(&[date("2024/06/01")], &snap, &log);

    assert_eq!(plan.to_add, vec![date("2024/06/01")]);
    let removed: Vec<String> = plan.to_remove.iter().map(|(_, id)| id.0.clone()).collect();
    // last date in display order survives
    assert_eq!(removed, vec!["a"]);
    let messages = log.into_messages();
    assert!(messages.iter().any(|m| m.contains("at least one date")));
}

#[test]
fn empty_desired_set_still_leaves_one_date() {
    let snap = snapshot(&[("2024/05/01", "a"), ("2024/05/02", "b"), ("2024/05/03", "c")]);
    let log = MessageLog::new();
    let plan = reconcile::plan(&[], &snap, &log);
    assert_eq!(plan.to_remove.len(), 2);
    assert_eq!(plan.to_remove.last().unwrap().1 .0, "b");
}
