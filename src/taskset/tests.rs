use assert_approx_eq::assert_approx_eq;

use super::{InvalidTask, Task, TaskSet};

fn task(id: u32, bcet: u64, wcet: u64, period: u64, deadline: u64) -> Task {
    Task {
        id,
        jitter: 0,
        bcet,
        wcet,
        period,
        deadline,
        pe: None,
    }
}

#[test]
fn accepts_well_formed_tasks() {
    let ts = TaskSet::new(vec![task(0, 5, 10, 100, 80), task(1, 5, 20, 200, 150)]);
    let ts = ts.expect("well-formed set must be accepted");
    assert_eq!(ts.len(), 2);
    assert!(!ts.is_empty());
    assert_eq!(ts.get(1).map(|t| t.wcet), Some(20));
    assert_eq!(ts.get(7), None);
}

#[test]
fn refuses_non_positive_period() {
    let err = TaskSet::new(vec![task(3, 1, 1, 0, 5)]).unwrap_err();
    assert_eq!(err, InvalidTask::NonPositivePeriod { id: 3 });
}

#[test]
fn refuses_non_positive_deadline() {
    let err = TaskSet::new(vec![task(4, 1, 1, 5, 0)]).unwrap_err();
    assert_eq!(err, InvalidTask::NonPositiveDeadline { id: 4 });
}

#[test]
fn refuses_zero_execution_time() {
    let err = TaskSet::new(vec![task(5, 0, 0, 5, 5)]).unwrap_err();
    assert_eq!(err, InvalidTask::NonPositiveExecutionTime { id: 5 });
}

#[test]
fn refuses_bcet_above_wcet() {
    let err = TaskSet::new(vec![task(6, 9, 3, 5, 5)]).unwrap_err();
    assert_eq!(
        err,
        InvalidTask::BcetExceedsWcet {
            id: 6,
            bcet: 9,
            wcet: 3
        }
    );
}

#[test]
fn refuses_duplicate_identifiers() {
    let err = TaskSet::new(vec![task(1, 1, 1, 5, 5), task(1, 1, 1, 7, 7)]).unwrap_err();
    assert_eq!(err, InvalidTask::DuplicateId { id: 1 });
}

#[test]
fn whole_set_refused_not_repaired() {
    // one bad task poisons the entire set
    let result = TaskSet::new(vec![task(0, 1, 2, 10, 10), task(1, 1, 1, 0, 5)]);
    assert!(result.is_err());
}

#[test]
fn utilization_sums_over_tasks() {
    let ts = TaskSet::new(vec![task(0, 5, 10, 100, 80), task(1, 5, 20, 200, 150)]).unwrap();
    assert_approx_eq!(ts.utilization(), 0.2, 1e-9);
    assert_approx_eq!(ts.tasks()[0].utilization(), 0.1, 1e-9);
}

#[test]
fn hyperperiod_is_lcm_of_periods() {
    let ts = TaskSet::new(vec![
        task(0, 1, 1, 10, 10),
        task(1, 1, 1, 20, 20),
        task(2, 1, 1, 50, 50),
    ])
    .unwrap();
    assert_eq!(ts.hyperperiod(), Some(100));
}

#[test]
fn hyperperiod_of_empty_set_is_none() {
    let ts = TaskSet::new(Vec::new()).unwrap();
    assert_eq!(ts.hyperperiod(), None);
}

#[test]
fn hyperperiod_overflow_is_none() {
    let huge = u64::MAX / 2 + 1;
    let ts = TaskSet::new(vec![
        task(0, 1, 1, huge, huge),
        task(1, 1, 1, huge - 1, huge - 1),
    ])
    .unwrap();
    assert_eq!(ts.hyperperiod(), None);
}

#[test]
fn dm_order_sorts_by_deadline_then_id() {
    let ts = TaskSet::new(vec![
        task(2, 1, 1, 50, 30),
        task(0, 1, 1, 50, 30),
        task(1, 1, 1, 50, 10),
    ])
    .unwrap();
    let ids: Vec<u32> = ts.dm_order().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 0, 2]);
}

#[test]
fn stored_order_is_not_scheduling_order() {
    let ts = TaskSet::new(vec![task(0, 1, 1, 100, 90), task(1, 1, 1, 10, 10)]).unwrap();
    assert_eq!(ts.tasks()[0].id, 0);
    assert_eq!(ts.dm_order()[0].id, 1);
}

#[test]
fn unconstrained_tasks_are_flagged() {
    let ts = TaskSet::new(vec![
        task(0, 1, 5, 10, 3),  // C > D
        task(1, 1, 2, 10, 20), // D > T
        task(2, 1, 2, 10, 10),
    ])
    .unwrap();
    assert_eq!(ts.unconstrained_tasks(), vec![0, 1]);
    assert!(ts.tasks()[2].constrained_deadline());
}

#[test]
fn pe_tag_is_carried_but_inert() {
    let mut t = task(0, 1, 1, 10, 10);
    t.pe = Some(3);
    let ts = TaskSet::new(vec![t]).unwrap();
    assert_eq!(ts.tasks()[0].pe, Some(3));
}

#[test]
fn task_set_serde_round_trip() {
    let ts = TaskSet::new(vec![task(0, 5, 10, 100, 80), task(1, 5, 20, 200, 150)]).unwrap();
    let json = serde_json::to_string(&ts).expect("serialize");
    let back: TaskSet = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(ts, back);
}
