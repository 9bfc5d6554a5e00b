use calendar_core::engine::{occurrences_collide, replace_event};
use calendar_core::{
    find_conflict, has_conflict, move_event, occurrences_on_day, plan_move, Event, Horizon,
    MoveOutcome, Recurrence,
};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

fn at(m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn slot(id: &str, start: NaiveDateTime, minutes: i64) -> Event {
    Event::with_id(id, id, start, start + TimeDelta::minutes(minutes))
}

fn june_horizon() -> Horizon {
    Horizon::starting_at(at(6, 1, 0, 0))
}

#[test]
fn conflict_verdict_is_symmetric() {
    let cases = [
        (slot("a", at(6, 3, 9, 0), 60), slot("b", at(6, 3, 9, 30), 60)),
        (slot("a", at(6, 3, 9, 0), 60), slot("b", at(6, 3, 10, 0), 60)),
        (slot("a", at(6, 3, 8, 0), 240), slot("b", at(6, 3, 9, 0), 30)),
        (slot("a", at(6, 3, 9, 0), 60), slot("b", at(6, 4, 9, 0), 60)),
        (
            slot("a", at(6, 2, 7, 0), 60).with_recurrence(Recurrence::daily()),
            slot("b", at(6, 18, 7, 30), 15).with_recurrence(Recurrence::weekly([3])),
        ),
    ];
    for (a, b) in cases {
        assert_eq!(
            has_conflict(&a, &[b.clone()], None, &june_horizon()),
            has_conflict(&b, &[a.clone()], None, &june_horizon()),
            "pair {} / {}",
            a.start,
            b.start
        );
    }
}

#[test]
fn touching_events_do_not_conflict_but_overlapping_ones_do() {
    let existing = vec![slot("meeting", at(6, 3, 9, 0), 60)];

    let after = slot("after", at(6, 3, 10, 0), 60);
    let before = slot("before", at(6, 3, 8, 0), 60);
    let overlapping = slot("overlap", at(6, 3, 9, 59), 30);

    assert!(!has_conflict(&after, &existing, None, &june_horizon()));
    assert!(!has_conflict(&before, &existing, None, &june_horizon()));
    assert!(has_conflict(&overlapping, &existing, None, &june_horizon()));
}

#[test]
fn recurring_conflict_reports_first_colliding_day() {
    let existing = vec![
        slot("gym", at(6, 2, 18, 0), 90).with_recurrence(Recurrence::weekly([1, 3])),
    ];
    // Friday daily from the 6th; first collision is Monday the 9th
    let candidate = slot("class", at(6, 6, 18, 30), 60).with_recurrence(Recurrence::daily());

    let pair = find_conflict(&candidate, &existing, None, &june_horizon()).unwrap();
    assert_eq!(pair.existing.id, "gym");
    assert_eq!(pair.day(), NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
    assert!(occurrences_collide(&pair.candidate, &pair.existing));
}

#[test]
fn conflicts_beyond_the_horizon_are_not_reported() {
    let existing = vec![slot("daily", at(6, 1, 9, 0), 60).with_recurrence(Recurrence::daily())];

    let inside = slot("late_nov", at(11, 30, 9, 30), 30);
    let outside = slot("dec", at(12, 1, 9, 30), 30);

    assert!(has_conflict(&inside, &existing, None, &june_horizon()));
    assert!(!has_conflict(&outside, &existing, None, &june_horizon()));
    assert!(has_conflict(
        &outside,
        &existing,
        None,
        &june_horizon().with_months(7)
    ));
}

#[test]
fn overnight_overlap_into_next_day_is_not_a_conflict() {
    let existing = vec![slot("night", at(6, 3, 23, 0), 120)];
    let early = slot("early", at(6, 4, 0, 30), 30);
    assert!(!has_conflict(&early, &existing, None, &june_horizon()));
}

#[test]
fn excluded_id_is_ignored() {
    let existing = vec![slot("a", at(6, 3, 9, 0), 60)];
    let edited = slot("a", at(6, 3, 9, 30), 60);
    assert!(has_conflict(&edited, &existing, None, &june_horizon()));
    assert!(!has_conflict(&edited, &existing, Some("a"), &june_horizon()));
}

#[test]
fn move_to_free_slot_shifts_both_ends() {
    let events = vec![
        slot("a", at(6, 3, 9, 0), 45).with_description("kept"),
        slot("b", at(6, 3, 11, 0), 60),
    ];
    let moved = move_event(&events, "a", at(6, 3, 13, 15), &june_horizon());

    assert_eq!(moved.len(), 2);
    assert_eq!(moved[0].id, "a");
    assert_eq!(moved[0].start, at(6, 3, 13, 15));
    assert_eq!(moved[0].end, at(6, 3, 14, 0));
    assert_eq!(moved[0].description.as_deref(), Some("kept"));
    assert_eq!(moved[1], events[1]);
}

#[test]
fn move_overlapping_own_previous_slot_is_allowed() {
    let events = vec![slot("a", at(6, 3, 9, 0), 60)];
    let moved = move_event(&events, "a", at(6, 3, 9, 30), &june_horizon());
    assert_eq!(moved[0].start, at(6, 3, 9, 30));
}

#[test]
fn conflicting_or_unknown_move_leaves_collection_unchanged() {
    let events = vec![slot("a", at(6, 3, 9, 0), 60), slot("b", at(6, 3, 11, 0), 60)];

    assert_eq!(
        move_event(&events, "a", at(6, 3, 10, 30), &june_horizon()),
        events
    );
    assert_eq!(
        plan_move(&events, "a", at(6, 3, 10, 30), &june_horizon()),
        MoveOutcome::Rejected
    );
    assert_eq!(
        move_event(&events, "missing", at(6, 3, 15, 0), &june_horizon()),
        events
    );
    assert_eq!(
        plan_move(&events, "missing", at(6, 3, 15, 0), &june_horizon()),
        MoveOutcome::NotFound
    );
}

#[test]
fn replace_event_without_match_is_a_copy() {
    let events = vec![slot("a", at(6, 3, 9, 0), 60)];
    assert_eq!(replace_event(&events, slot("z", at(6, 4, 9, 0), 60)), events);
}

#[test]
fn day_lookup_mixes_single_and_recurring_events() {
    let events = vec![
        slot("weekly", at(6, 2, 7, 0), 30).with_recurrence(Recurrence::weekly([1])),
        slot("single", at(6, 9, 12, 0), 60),
        slot("other_day", at(6, 10, 12, 0), 60),
        slot("ended", at(6, 2, 8, 0), 30)
            .with_recurrence(Recurrence::daily().until(NaiveDate::from_ymd_opt(2025, 6, 5).unwrap())),
    ];

    let found = occurrences_on_day(&events, NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
    let ids: Vec<_> = found.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["single", "weekly"]);
    assert_eq!(found[1].start, at(6, 9, 7, 0));
}
