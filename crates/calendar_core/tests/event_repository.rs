use calendar_core::db::migrations::latest_version;
use calendar_core::db::open_db_in_memory;
use calendar_core::{
    Event, EventColor, EventRepository, EventValidationError, IntervalUnit,
    JsonFileEventRepository, Recurrence, RecurrenceRule, RepoError, SqliteEventRepository,
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde_json::{json, Value};

fn at(d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn sample_events() -> Vec<Event> {
    vec![
        Event::with_id("zeta", "weekly sync", at(2, 9), at(2, 10))
            .with_recurrence(
                Recurrence::weekly([1, 3]).until(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()),
            )
            .with_color(EventColor::Green),
        Event::with_id("alpha", "one-off", at(3, 14), at(3, 15)).with_description("room 4"),
        Event::with_id("mid", "fortnightly", at(4, 8), at(4, 8))
            .with_recurrence(Recurrence::every(2, IntervalUnit::Weeks)),
        Event::with_id("fallback", "custom", at(5, 8), at(5, 9))
            .with_recurrence(Recurrence::from_rule(RecurrenceRule::Custom { every: None })),
    ]
}

#[test]
fn sqlite_round_trip_preserves_fields_and_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::try_new(&conn).unwrap();

    assert!(repo.load_events().unwrap().is_empty());

    let events = sample_events();
    repo.save_events(&events).unwrap();
    assert_eq!(repo.load_events().unwrap(), events);

    let reordered: Vec<Event> = events.iter().rev().cloned().collect();
    repo.save_events(&reordered).unwrap();
    assert_eq!(repo.load_events().unwrap(), reordered);

    repo.save_events(&events[..1]).unwrap();
    assert_eq!(repo.load_events().unwrap(), events[..1].to_vec());
}

#[test]
fn sqlite_save_rejects_invalid_collections_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::try_new(&conn).unwrap();
    let events = sample_events();
    repo.save_events(&events).unwrap();

    let mut duplicated = events.clone();
    duplicated.push(events[0].clone());
    assert!(matches!(
        repo.save_events(&duplicated),
        Err(RepoError::DuplicateId(id)) if id == "zeta"
    ));

    let reversed = vec![Event::with_id("r", "bad", at(2, 10), at(2, 9))];
    assert!(matches!(
        repo.save_events(&reversed),
        Err(RepoError::Validation(EventValidationError::InvalidTimeRange { .. }))
    ));

    assert_eq!(repo.load_events().unwrap(), events);
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteEventRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        }) => {
            assert_eq!(expected_version, latest_version());
            assert_eq!(actual_version, 0);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unmigrated connection must be rejected"),
    }
}

#[test]
fn try_new_rejects_missing_events_table() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE events;").unwrap();
    assert!(matches!(
        SqliteEventRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("events"))
    ));
}

#[test]
fn sqlite_load_rejects_corrupted_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::try_new(&conn).unwrap();

    conn.execute(
        "INSERT INTO events (id, position, title, start_at, end_at)
         VALUES ('bad', 0, 'x', 'yesterday', '2025-06-02T10:00:00');",
        [],
    )
    .unwrap();
    assert!(matches!(repo.load_events(), Err(RepoError::InvalidData(_))));

    conn.execute(
        "UPDATE events SET start_at = '2025-06-02T09:00:00', recurrence_type = 'hourly';",
        [],
    )
    .unwrap();
    assert!(matches!(repo.load_events(), Err(RepoError::InvalidData(_))));

    conn.execute(
        "UPDATE events SET recurrence_type = 'none', title = '   ';",
        [],
    )
    .unwrap();
    assert!(matches!(
        repo.load_events(),
        Err(RepoError::Validation(EventValidationError::EmptyTitle))
    ));
}

#[test]
fn json_repository_treats_missing_file_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileEventRepository::new(dir.path().join("nested").join("events.json"));

    assert!(repo.load_events().unwrap().is_empty());

    let events = sample_events();
    repo.save_events(&events).unwrap();
    assert!(repo.path().exists());
    assert_eq!(repo.load_events().unwrap(), events);
}

#[test]
fn json_repository_failed_replace_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("events.json");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("occupied"), "x").unwrap();

    let repo = JsonFileEventRepository::new(&target);
    assert!(matches!(
        repo.save_events(&sample_events()),
        Err(RepoError::Io(_))
    ));
    assert!(!dir.path().join("events.json.tmp").exists());
    assert!(target.join("occupied").exists());
}

#[test]
fn json_repository_rejects_malformed_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    std::fs::write(&path, "{ not json").unwrap();

    let repo = JsonFileEventRepository::new(&path);
    assert!(matches!(
        repo.load_events(),
        Err(RepoError::Serialization(_))
    ));
}

#[test]
fn event_wire_shape_is_stable() {
    let events = sample_events();
    let value = serde_json::to_value(&events).unwrap();

    assert_eq!(
        value[0],
        json!({
            "id": "zeta",
            "title": "weekly sync",
            "start": "2025-06-02T09:00:00",
            "end": "2025-06-02T10:00:00",
            "color": "green",
            "recurrence": {
                "type": "weekly",
                "days_of_week": [1, 3],
                "until": "2025-09-01"
            }
        })
    );
    assert_eq!(value[1]["description"], "room 4");
    assert_eq!(value[1]["recurrence"], json!({ "type": "none" }));
    assert_eq!(
        value[2]["recurrence"],
        json!({ "type": "custom", "every": { "interval": 2, "unit": "weeks" } })
    );
    assert_eq!(value[3]["recurrence"], json!({ "type": "custom" }));
}

#[test]
fn minimal_document_fills_defaults() {
    let raw = json!([{
        "id": "min",
        "title": "bare",
        "start": "2025-06-02T09:00:00",
        "end": "2025-06-02T09:30:00"
    }]);
    let events: Vec<Event> = serde_json::from_value(raw).unwrap();
    assert_eq!(events[0].color, EventColor::Blue);
    assert!(!events[0].is_recurring());
    assert_eq!(events[0].description, None);

    let weekly: Value = json!({ "type": "weekly" });
    let recurrence: Recurrence = serde_json::from_value(weekly).unwrap();
    assert_eq!(
        recurrence.rule,
        RecurrenceRule::Weekly {
            days_of_week: Vec::new()
        }
    );
}
