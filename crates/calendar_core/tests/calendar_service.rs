use calendar_core::db::open_db;
use calendar_core::{
    CalendarService, Event, EventColor, EventValidationError, InMemoryEventRepository,
    MoveOutcome, Recurrence, ServiceError, SqliteEventRepository,
};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

fn at(m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn now() -> NaiveDateTime {
    at(6, 1, 8, 0)
}

fn draft(title: &str, start: NaiveDateTime, minutes: i64) -> Event {
    Event::new(title, start, start + TimeDelta::minutes(minutes))
}

#[test]
fn create_appends_and_persists() {
    let repo = InMemoryEventRepository::new();
    let mut service = CalendarService::open(&repo, 6).unwrap();

    let first = service
        .create_event(draft("standup", at(6, 2, 9, 0), 15), now())
        .unwrap();
    let second = service
        .create_event(draft("lunch", at(6, 2, 12, 0), 60), now())
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(service.events(), &[first.clone(), second.clone()]);
    assert_eq!(repo.snapshot(), vec![first, second]);
    assert_eq!(repo.save_count(), 2);
}

#[test]
fn create_rejects_invalid_drafts_before_persisting() {
    let repo = InMemoryEventRepository::new();
    let mut service = CalendarService::open(&repo, 6).unwrap();

    let blank = service.create_event(draft("  ", at(6, 2, 9, 0), 15), now());
    assert!(matches!(
        blank,
        Err(ServiceError::Validation(EventValidationError::EmptyTitle))
    ));

    let reversed = service.create_event(draft("x", at(6, 2, 9, 0), -15), now());
    assert!(matches!(
        reversed,
        Err(ServiceError::Validation(
            EventValidationError::InvalidTimeRange { .. }
        ))
    ));

    assert!(service.events().is_empty());
    assert_eq!(repo.save_count(), 0);
}

#[test]
fn create_rejects_conflicts_with_recurring_events() {
    let repo = InMemoryEventRepository::new();
    let mut service = CalendarService::open(&repo, 6).unwrap();
    let gym = service
        .create_event(
            draft("gym", at(6, 2, 18, 0), 60).with_recurrence(Recurrence::weekly([1, 3])),
            now(),
        )
        .unwrap();

    let err = service
        .create_event(draft("dinner", at(6, 18, 18, 30), 60), now())
        .unwrap_err();
    match err {
        ServiceError::Conflict { existing_id, day } => {
            assert_eq!(existing_id, gym.id);
            assert_eq!(day, NaiveDate::from_ymd_opt(2025, 6, 18).unwrap());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.events().len(), 1);
}

#[test]
fn update_replaces_in_place_and_ignores_own_previous_version() {
    let repo = InMemoryEventRepository::new();
    let mut service = CalendarService::open(&repo, 6).unwrap();
    let a = service
        .create_event(draft("a", at(6, 2, 9, 0), 60), now())
        .unwrap();
    let b = service
        .create_event(draft("b", at(6, 2, 11, 0), 60), now())
        .unwrap();

    let mut edited = a.clone();
    edited.start = at(6, 2, 9, 30);
    edited.end = at(6, 2, 10, 30);
    edited.color = EventColor::Red;
    assert!(service.update_event(edited.clone(), now()).unwrap());
    assert_eq!(service.events(), &[edited.clone(), b.clone()]);

    let mut clashing = edited.clone();
    clashing.end = at(6, 2, 11, 30);
    assert!(matches!(
        service.update_event(clashing, now()),
        Err(ServiceError::Conflict { .. })
    ));
    assert_eq!(service.events(), &[edited, b]);
}

#[test]
fn update_and_delete_of_unknown_id_are_no_ops() {
    let repo = InMemoryEventRepository::new();
    let mut service = CalendarService::open(&repo, 6).unwrap();
    service
        .create_event(draft("a", at(6, 2, 9, 0), 60), now())
        .unwrap();

    let ghost = Event::with_id("ghost", "ghost", at(6, 3, 9, 0), at(6, 3, 10, 0));
    assert!(!service.update_event(ghost, now()).unwrap());
    assert!(!service.delete_event("ghost").unwrap());
    assert_eq!(service.events().len(), 1);
    assert_eq!(repo.save_count(), 1);
}

#[test]
fn delete_removes_event() {
    let repo = InMemoryEventRepository::new();
    let mut service = CalendarService::open(&repo, 6).unwrap();
    let a = service
        .create_event(draft("a", at(6, 2, 9, 0), 60), now())
        .unwrap();

    assert!(service.delete_event(&a.id).unwrap());
    assert!(service.events().is_empty());
    assert!(repo.snapshot().is_empty());
}

#[test]
fn move_reports_each_outcome() {
    let repo = InMemoryEventRepository::new();
    let mut service = CalendarService::open(&repo, 6).unwrap();
    let a = service
        .create_event(draft("a", at(6, 2, 9, 0), 60), now())
        .unwrap();
    service
        .create_event(draft("b", at(6, 2, 11, 0), 60), now())
        .unwrap();

    let rejected = service.move_event(&a.id, at(6, 2, 10, 30), now()).unwrap();
    assert_eq!(rejected, MoveOutcome::Rejected);
    assert_eq!(service.events()[0], a);

    let missing = service.move_event("nope", at(6, 2, 10, 30), now()).unwrap();
    assert_eq!(missing, MoveOutcome::NotFound);

    let moved = service.move_event(&a.id, at(6, 3, 11, 0), now()).unwrap();
    let MoveOutcome::Moved(shifted) = moved else {
        panic!("expected move to succeed");
    };
    assert_eq!(shifted.end, at(6, 3, 12, 0));
    assert_eq!(service.events()[0], shifted);
    assert_eq!(repo.snapshot()[0], shifted);
}

#[test]
fn queries_project_the_current_collection() {
    let repo = InMemoryEventRepository::new();
    let mut service = CalendarService::open(&repo, 6).unwrap();
    let daily = service
        .create_event(
            draft("standup", at(6, 2, 9, 0), 15).with_recurrence(Recurrence::daily()),
            now(),
        )
        .unwrap();

    let day = service.events_for_day(NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].start, at(6, 4, 9, 0));

    let week = service.occurrences_between(at(6, 2, 0, 0), at(6, 9, 0, 0));
    assert_eq!(week.len(), 7);
    assert_eq!(
        service
            .occurrences_of(&daily.id, at(6, 2, 0, 0), at(6, 4, 0, 0))
            .len(),
        2
    );

    let candidate = draft("candidate", at(6, 5, 9, 10), 5);
    assert!(service.check_conflict(&candidate, None, now()).is_some());
    assert!(service.check_conflict(&candidate, None, at(6, 6, 0, 0)).is_none());
}

#[test]
fn sqlite_backed_service_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calendar.db");

    let created = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteEventRepository::try_new(&conn).unwrap();
        let mut service = CalendarService::open(repo, 6).unwrap();
        vec![
            service
                .create_event(
                    draft("review", at(6, 2, 14, 0), 30)
                        .with_description("quarterly")
                        .with_color(EventColor::Purple)
                        .with_recurrence(
                            Recurrence::monthly()
                                .until(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()),
                        ),
                    now(),
                )
                .unwrap(),
            service
                .create_event(draft("once", at(6, 3, 9, 0), 60), now())
                .unwrap(),
        ]
    };

    let conn = open_db(&path).unwrap();
    let repo = SqliteEventRepository::try_new(&conn).unwrap();
    let service = CalendarService::open(repo, 6).unwrap();
    assert_eq!(service.events(), created.as_slice());
}
