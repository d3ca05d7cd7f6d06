// Property-based tests for the entity stores
//
// Invariants checked after every operation of a random mutation sequence:
// 1. total == collection length, and the category buckets sum to total
// 2. every bucket equals the number of entities in that category
// 3. the incrementally maintained mean equals a from-scratch recompute
// 4. emptying a store resets its summary to zero (no NaN)
// 5. a selected entity always mirrors its collection entry

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use chrono::{NaiveDate, Utc};
use interna_core::entity::attendance::{AttendancePatch, AttendanceRecord, AttendanceStatus};
use interna_core::entity::evaluation::{Evaluation, EvaluationPatch, EvaluationType};
use interna_core::entity::notification::{
    Notification, NotificationKind, NotificationPatch, NotificationState,
};
use interna_core::entity::reclamation::{Reclamation, ReclamationPatch, ReclamationStatus};
use interna_core::entity::task::{Task, TaskPatch, TaskPriority, TaskStatus};
use interna_core::store::{Entity, EntityId, EntityStore, Summary};
use proptest::prelude::*;
use strum::IntoEnumIterator;

#[derive(Debug, Clone)]
enum Op<E: Entity> {
    Add(E),
    Update(EntityId, E::Patch),
    Delete(EntityId),
    Select(EntityId),
}

fn id_strategy() -> impl Strategy<Value = EntityId> {
    // Small id space so that duplicates and misses are frequent
    0i64..12
}

fn score_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![(0u32..=100).prop_map(f64::from), 0.0f64..=100.0]
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

// ============================================================================
// Strategies per kind
// ============================================================================

fn evaluation_type_strategy() -> impl Strategy<Value = EvaluationType> {
    prop_oneof![
        Just(EvaluationType::Weekly),
        Just(EvaluationType::Monthly),
        Just(EvaluationType::MidTerm),
        Just(EvaluationType::Final),
    ]
}

fn evaluation_op_strategy() -> impl Strategy<Value = Op<Evaluation>> {
    prop_oneof![
        (id_strategy(), evaluation_type_strategy(), score_strategy()).prop_map(
            |(id, evaluation_type, score)| {
                Op::Add(Evaluation {
                    id,
                    intern_id: 1,
                    evaluator_id: 2,
                    evaluation_type,
                    score,
                    comments: String::new(),
                    date: date(),
                })
            }
        ),
        (
            id_strategy(),
            proptest::option::of(evaluation_type_strategy()),
            proptest::option::of(score_strategy())
        )
            .prop_map(|(id, evaluation_type, score)| {
                Op::Update(
                    id,
                    EvaluationPatch {
                        evaluation_type,
                        score,
                        ..Default::default()
                    },
                )
            }),
        id_strategy().prop_map(Op::Delete),
        id_strategy().prop_map(Op::Select),
    ]
}

fn attendance_status_strategy() -> impl Strategy<Value = AttendanceStatus> {
    prop_oneof![
        Just(AttendanceStatus::Present),
        Just(AttendanceStatus::Absent),
        Just(AttendanceStatus::Late),
        Just(AttendanceStatus::Excused),
    ]
}

fn attendance_op_strategy() -> impl Strategy<Value = Op<AttendanceRecord>> {
    prop_oneof![
        (id_strategy(), attendance_status_strategy()).prop_map(|(id, status)| {
            Op::Add(AttendanceRecord {
                id,
                intern_id: 1,
                date: date(),
                status,
                check_in: None,
                check_out: None,
                notes: None,
            })
        }),
        (id_strategy(), attendance_status_strategy())
            .prop_map(|(id, status)| Op::Update(id, AttendancePatch::status(status))),
        id_strategy().prop_map(Op::Delete),
        id_strategy().prop_map(Op::Select),
    ]
}

fn task_status_strategy() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Completed),
        Just(TaskStatus::Cancelled),
    ]
}

fn task_op_strategy() -> impl Strategy<Value = Op<Task>> {
    prop_oneof![
        (id_strategy(), task_status_strategy()).prop_map(|(id, status)| {
            Op::Add(Task {
                id,
                title: format!("Task {}", id),
                description: String::new(),
                status,
                priority: TaskPriority::Medium,
                deadline: None,
                assigned_to: None,
                created_by: 1,
                created_at: Utc::now(),
            })
        }),
        (id_strategy(), proptest::option::of(task_status_strategy())).prop_map(|(id, status)| {
            Op::Update(
                id,
                TaskPatch {
                    status,
                    ..Default::default()
                },
            )
        }),
        id_strategy().prop_map(Op::Delete),
        id_strategy().prop_map(Op::Select),
    ]
}

fn reclamation_status_strategy() -> impl Strategy<Value = ReclamationStatus> {
    // Wire names, including the legacy alias of `resolved`
    prop_oneof![
        Just("pending"),
        Just("in_progress"),
        Just("resolved"),
        Just("solved"),
        Just("rejected"),
    ]
    .prop_map(|name| {
        serde_json::from_value::<ReclamationStatus>(serde_json::Value::from(name)).unwrap()
    })
}

fn reclamation_op_strategy() -> impl Strategy<Value = Op<Reclamation>> {
    prop_oneof![
        (id_strategy(), reclamation_status_strategy()).prop_map(|(id, status)| {
            Op::Add(Reclamation {
                id,
                intern_id: 1,
                subject: format!("Reclamation {}", id),
                description: String::new(),
                status,
                response: None,
                created_at: Utc::now(),
            })
        }),
        (id_strategy(), proptest::option::of(reclamation_status_strategy())).prop_map(
            |(id, status)| {
                Op::Update(
                    id,
                    ReclamationPatch {
                        status,
                        ..Default::default()
                    },
                )
            }
        ),
        id_strategy().prop_map(Op::Delete),
        id_strategy().prop_map(Op::Select),
    ]
}

fn notification_state_strategy() -> impl Strategy<Value = NotificationState> {
    prop_oneof![Just(NotificationState::Unread), Just(NotificationState::Read)]
}

fn notification_op_strategy() -> impl Strategy<Value = Op<Notification>> {
    prop_oneof![
        (id_strategy(), notification_state_strategy()).prop_map(|(id, state)| {
            Op::Add(Notification {
                id,
                recipient_id: 1,
                kind: NotificationKind::Info,
                title: format!("Notice {}", id),
                message: String::new(),
                state,
                link: None,
                created_at: Utc::now(),
            })
        }),
        (id_strategy(), proptest::option::of(notification_state_strategy()))
            .prop_map(|(id, state)| Op::Update(id, NotificationPatch { state })),
        id_strategy().prop_map(Op::Delete),
        id_strategy().prop_map(Op::Select),
    ]
}

// ============================================================================
// Shared checks
// ============================================================================

fn apply<E: Entity>(store: &mut EntityStore<E>, op: Op<E>) {
    match op {
        Op::Add(entity) => {
            let id = entity.id();
            let existed = store.contains(id);
            let before_len = store.len();
            let result = store.add(entity);
            if existed {
                let err = result.expect_err("duplicate add must fail");
                assert!(err.is_invariant_violation());
                assert_eq!(store.len(), before_len);
            } else {
                result.unwrap();
                assert_eq!(store.items()[0].id(), id);
            }
        }
        Op::Update(id, patch) => {
            let existed = store.contains(id);
            let total = store.summary().total;
            assert_eq!(store.update(id, &patch).is_applied(), existed);
            assert_eq!(store.summary().total, total);
        }
        Op::Delete(id) => {
            let existed = store.contains(id);
            assert_eq!(store.delete(id).is_applied(), existed);
            assert!(!store.contains(id));
            assert!(store.selected().is_none_or(|s| s.id() != id));
        }
        Op::Select(id) => {
            let existed = store.contains(id);
            assert_eq!(store.select(id).is_applied(), existed);
            if existed {
                assert_eq!(store.selected().map(|s| s.id()), Some(id));
            }
        }
    }
}

fn check_invariants<E: Entity>(store: &EntityStore<E>) {
    let summary = store.summary();
    let recomputed = store.recompute_summary();

    assert_eq!(summary.total, store.len());
    assert_eq!(summary.bucket_sum(), summary.total);
    for category in E::Category::iter() {
        let members = store
            .items()
            .iter()
            .filter(|e| e.category() == category)
            .count();
        assert_eq!(summary.count(category), members, "{:?}", category);
    }
    assert!(
        summary.mean.approx_eq(&recomputed.mean),
        "incremental {:?} vs recomputed {:?}",
        summary.mean,
        recomputed.mean
    );
    assert!(!summary.mean.value.is_nan());

    if let Some(selected) = store.selected() {
        let entry = store
            .get(selected.id())
            .expect("selected entity must be in the collection");
        assert_eq!(format!("{:?}", selected), format!("{:?}", entry));
    }

    let mut ids: Vec<_> = store.items().iter().map(|e| e.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), store.len());
}

fn run<E: Entity>(ops: Vec<Op<E>>) {
    let mut store = EntityStore::<E>::new();
    check_invariants(&store);
    for op in ops {
        apply(&mut store, op);
        check_invariants(&store);
    }

    let ids: Vec<_> = store.items().iter().map(|e| e.id()).collect();
    for id in ids {
        store.delete(id);
        check_invariants(&store);
    }
    assert_eq!(store.summary(), &Summary::zero());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn evaluation_summary_tracks_collection(ops in prop::collection::vec(evaluation_op_strategy(), 0..80)) {
        run(ops);
    }

    #[test]
    fn attendance_summary_tracks_collection(ops in prop::collection::vec(attendance_op_strategy(), 0..80)) {
        run(ops);
    }

    #[test]
    fn task_summary_tracks_collection(ops in prop::collection::vec(task_op_strategy(), 0..80)) {
        run(ops);
    }

    #[test]
    fn reclamation_summary_tracks_collection(ops in prop::collection::vec(reclamation_op_strategy(), 0..80)) {
        run(ops);
    }

    #[test]
    fn notification_summary_tracks_collection(ops in prop::collection::vec(notification_op_strategy(), 0..80)) {
        run(ops);
    }

    #[test]
    fn load_all_matches_scan(scores in prop::collection::vec(score_strategy(), 0..40)) {
        let entities: Vec<Evaluation> = scores
            .iter()
            .enumerate()
            .map(|(i, &score)| Evaluation {
                id: i as EntityId,
                intern_id: 1,
                evaluator_id: 2,
                evaluation_type: EvaluationType::Weekly,
                score,
                comments: String::new(),
                date: date(),
            })
            .collect();
        let mut store = EntityStore::<Evaluation>::new();
        store.load_all(entities, None);
        check_invariants(&store);
        if !scores.is_empty() {
            let expected = scores.iter().sum::<f64>() / scores.len() as f64;
            prop_assert!((store.summary().mean.value - expected).abs() < 1e-9);
        }
    }
}

#[test]
fn scenario_update_score_recomputes_average() {
    let mut store = EntityStore::<Evaluation>::new();
    let make = |id, score| Evaluation {
        id,
        intern_id: 1,
        evaluator_id: 2,
        evaluation_type: EvaluationType::Final,
        score,
        comments: String::new(),
        date: date(),
    };
    store.load_all(vec![make(1, 80.0), make(2, 90.0)], None);
    store.update(1, &EvaluationPatch::score(100.0));
    assert!((store.summary().mean.value - 95.0).abs() < 1e-9);
    check_invariants(&store);
}
