//! Integration tests for availability and submission rules.

mod common;

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use roombook_core::config::AppConfig;
use roombook_core::events::ReservationEvent;
use roombook_engine::{ConflictKind, RejectionReason, SlotAvailability};
use roombook_entity::day::Day;
use roombook_entity::slot::Slot;
use roombook_realtime::MemoryDocumentStore;

use common::{PENDING, RecordingNotifier, engine, request, tuesday};

#[tokio::test]
async fn test_tuesday_midday_offers_only_espectacle() {
    let engine = engine(
        Arc::new(MemoryDocumentStore::new(16)),
        Arc::new(RecordingNotifier::default()),
    );
    let rooms = engine
        .available_rooms(tuesday(), &Slot::from("11:20 - 12:20"))
        .await;
    assert_eq!(rooms, BTreeSet::from(["Espectacle".to_string()]));
}

#[tokio::test]
async fn test_reserved_slot_is_unavailable_not_invalid() {
    let store = Arc::new(MemoryDocumentStore::new(16));
    let engine = engine(store, Arc::new(RecordingNotifier::default()));
    engine
        .submit(request("Espectacle", &["11:20 - 12:20"], &["Ana"], "u1"))
        .await
        .unwrap();

    let slot = Slot::from("11:20 - 12:20");
    assert!(engine.available_rooms(tuesday(), &slot).await.is_empty());
    assert_eq!(
        engine.classify(tuesday(), &slot).await,
        SlotAvailability::Unavailable
    );

    let thursday = Day::from_ymd(2025, 1, 16).unwrap();
    assert_eq!(
        engine.classify(thursday, &slot).await,
        SlotAvailability::Invalid
    );
}

#[tokio::test]
async fn test_blank_participant_list_rejected() {
    let store = Arc::new(MemoryDocumentStore::new(16));
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = engine(store.clone(), notifier.clone());

    let err = engine
        .submit(request("Espectacle", &["11:20 - 12:20"], &[""], "u1"))
        .await
        .unwrap_err();
    assert!(matches!(err, RejectionReason::EmptyParticipantList));
    assert!(!err.is_retryable());

    engine.drain_notifications().await;
    assert!(store.documents(PENDING).is_empty());
    assert_eq!(notifier.count().await, 0);
}

#[tokio::test]
async fn test_holiday_blocks_every_room_and_slot() {
    let config = AppConfig::default();
    let engine = engine(
        Arc::new(MemoryDocumentStore::new(16)),
        Arc::new(RecordingNotifier::default()),
    );

    for date in &config.holidays.dates {
        let day: Day = date.parse().unwrap();
        for room in engine.catalog().rooms() {
            let mut req = request(&room.name, &["8:00 - 9:00"], &["Ana"], "u1");
            req.day = day;
            let err = engine.submit(req).await.unwrap_err();
            assert!(
                matches!(err, RejectionReason::HolidayBlocked { day: d } if d == day),
                "{date} / {}: {err:?}",
                room.name
            );
        }
    }
}

#[tokio::test]
async fn test_second_submission_before_echo_conflicts() {
    let store = Arc::new(MemoryDocumentStore::new(16));
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = engine(store.clone(), notifier.clone());
    let mut events = engine.subscribe_events();

    engine
        .submit(request("Espectacle", &["11:20 - 12:20"], &["Ana"], "u1"))
        .await
        .unwrap();
    let err = engine
        .submit(request("Espectacle", &["11:20 - 12:20"], &["Luis"], "u1"))
        .await
        .unwrap_err();

    match err {
        RejectionReason::SlotConflict { slot, conflict } => {
            assert_eq!(slot, Slot::from("11:20 - 12:20"));
            assert_eq!(conflict, ConflictKind::AlreadyReserved);
        }
        other => panic!("unexpected rejection: {other:?}"),
    }
    assert_eq!(store.documents(PENDING).len(), 1);

    engine.drain_notifications().await;
    assert_eq!(notifier.count().await, 1);

    let first = events.recv().await.unwrap();
    assert!(matches!(first.payload, ReservationEvent::Submitted { .. }));
    let second = events.recv().await.unwrap();
    assert!(matches!(second.payload, ReservationEvent::Rejected { .. }));
}

#[tokio::test]
async fn test_multi_slot_submission_sends_one_notification() {
    let store = Arc::new(MemoryDocumentStore::new(16));
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = engine(store.clone(), notifier.clone());

    let batch = engine
        .submit(request(
            "A24",
            &["16:00 - 16:55", "15:00 - 16:00", "8:00 - 9:00"],
            &["Ana", "  ", "Luis"],
            "u1",
        ))
        .await
        .unwrap();

    let slots: Vec<&str> = batch.reservations.iter().map(|r| r.slot.label()).collect();
    assert_eq!(slots, vec!["8:00 - 9:00", "15:00 - 16:00", "16:00 - 16:55"]);
    assert!(batch
        .reservations
        .iter()
        .all(|r| r.participants == vec!["Ana".to_string(), "Luis".to_string()]));
    let created: HashSet<_> = batch.reservations.iter().map(|r| r.created_at).collect();
    assert_eq!(created.len(), 1);

    engine.drain_notifications().await;
    let sent = notifier.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "u1@example.org");
    assert_eq!(sent[0].1["slots"], "8:00 - 9:00, 15:00 - 16:00, 16:00 - 16:55");
}

#[tokio::test]
async fn test_submissions_never_duplicate_a_key() {
    let store = Arc::new(MemoryDocumentStore::new(64));
    let engine = engine(store.clone(), Arc::new(RecordingNotifier::default()));
    let slots: Vec<String> = engine
        .catalog()
        .slots()
        .iter()
        .map(|s| s.label().to_string())
        .collect();

    for (i, slot) in slots.iter().enumerate() {
        for room in ["A24", "Espectacle", "Aula Podcast", "A24"] {
            let who = format!("u{i}");
            let _ = engine
                .submit(request(room, &[slot.as_str()], &["Ana"], &who))
                .await;
        }
    }

    let snapshot = engine.snapshot().await;
    let mut keys = HashSet::new();
    for reservation in snapshot.iter() {
        assert!(keys.insert(reservation.key()), "duplicate {:?}", reservation.key());
    }
    assert_eq!(keys.len(), store.documents(PENDING).len());
}

#[tokio::test]
async fn test_day_view_is_collapsed_and_marks_requester() {
    let engine = engine(
        Arc::new(MemoryDocumentStore::new(16)),
        Arc::new(RecordingNotifier::default()),
    );
    engine
        .submit(request("A24", &["8:00 - 9:00"], &["Ana"], "u1"))
        .await
        .unwrap();

    let me = roombook_core::types::id::RequesterId::new("u1");
    let view = engine.day_view(tuesday(), Some(&me)).await;
    let roombook_engine::DayAvailability::Slots { slots, .. } = view else {
        panic!("expected slot rows");
    };
    assert_eq!(slots.len(), engine.catalog().slots().len());
    assert!(slots[0].reserved_by_requester);
    assert!(slots.iter().skip(1).all(|s| !s.reserved_by_requester));
}

#[tokio::test]
async fn test_foreign_shaped_record_still_blocks_its_slot() {
    let store = Arc::new(MemoryDocumentStore::new(16));
    store.seed(
        PENDING,
        [serde_json::json!({
            "location": "Espectacle",
            "day": "2025-01-14",
            "hour": "11:20 - 12:20",
            "createdAt": {"seconds": 1736848800, "nanoseconds": 0},
            "user": 7,
            "userId": "legacy",
            "type": "Aula",
            "students": "Ana, Luis",
        })],
    );
    let engine = engine(store.clone(), Arc::new(RecordingNotifier::default()));

    let outcome = engine.sync_once().await.unwrap();
    assert_eq!(outcome.decoded, 1);

    let slot = Slot::from("11:20 - 12:20");
    assert_eq!(
        engine.classify(tuesday(), &slot).await,
        SlotAvailability::Unavailable
    );
    let err = engine
        .submit(request("Espectacle", &["11:20 - 12:20"], &["Marc"], "u1"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RejectionReason::SlotConflict {
            conflict: ConflictKind::AlreadyReserved,
            ..
        }
    ));
    assert_eq!(store.documents(PENDING).len(), 1);
}

#[tokio::test]
async fn test_weekend_days_are_refused_for_every_room() {
    let store = Arc::new(MemoryDocumentStore::new(16));
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = engine(store.clone(), notifier.clone());

    for day in [Day::from_ymd(2025, 1, 18).unwrap(), Day::from_ymd(2025, 1, 19).unwrap()] {
        for room in engine.catalog().rooms() {
            let mut req = request(&room.name, &["8:00 - 9:00"], &["Ana"], "u1");
            req.day = day;
            let err = engine.submit(req).await.unwrap_err();
            assert_eq!(err.code(), "weekend_blocked", "{day} / {}", room.name);
            assert!(!err.is_retryable());
        }
    }

    engine.drain_notifications().await;
    assert!(store.documents(PENDING).is_empty());
    assert_eq!(notifier.count().await, 0);
}
