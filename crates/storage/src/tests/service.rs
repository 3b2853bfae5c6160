//! The domain service driven through the document store, covering the full
//! persistence round trip of each flow.

use chrono::NaiveDate;
use flextrack_domain as domain;
use flextrack_domain::{
    Confirmation, Confirmed, Decision, LogOutcome, MachineService, Prompt, Resolution,
    StatisticsService, WorkoutService,
};
use pretty_assertions::assert_eq;

use crate::archive::Archive;
use crate::document::DocumentStore;
use crate::memory::MemoryStore;

struct Always(Decision);

impl Confirmation for Always {
    fn confirm(&self, _: &Prompt) -> Decision {
        self.0
    }
}

fn service() -> domain::Service<DocumentStore<MemoryStore>, Always> {
    domain::Service::new(
        DocumentStore::new(MemoryStore::new()),
        Always(Decision::Proceed),
    )
}

#[test]
fn test_log_and_read_back() {
    let service = service();
    let machine = service.create_machine("Leg Press", "a1B2c3").unwrap();

    let outcome = service
        .log_exercise(
            date(2024, 1, 15),
            machine.id,
            &[row(80.0, 10), row(85.0, 8)],
            "felt strong",
        )
        .unwrap();
    assert!(matches!(outcome, LogOutcome::Logged(_)));

    let workouts = service.get_workouts().unwrap();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0].date, date(2024, 1, 15));
    assert_eq!(workouts[0].exercises[0].machine_name, "Leg Press");
    assert_eq!(
        workouts[0].exercises[0].machine_image,
        Some("https://i.imgur.com/a1B2c3.jpeg".to_string())
    );
}

#[test]
fn test_conflict_resolution_is_persisted() {
    let service = service();
    let machine = service.create_machine("Leg Press", "").unwrap();
    service
        .log_exercise(date(2024, 1, 15), machine.id, &[row(80.0, 10)], "first")
        .unwrap();

    let LogOutcome::Conflict(conflict) = service
        .log_exercise(date(2024, 1, 15), machine.id, &[row(85.0, 5)], "")
        .unwrap()
    else {
        panic!("expected conflict");
    };
    let entry = service
        .resolve_conflict(conflict, Resolution::Merge)
        .unwrap();

    assert_eq!(entry.sets.len(), 2);
    assert_eq!(entry.notes, "first");
    assert_eq!(service.get_workouts().unwrap()[0].exercises, vec![entry]);
}

#[test]
fn test_delete_machine_cascades_across_documents() {
    let service = service();
    let leg_press = service.create_machine("Leg Press", "").unwrap();
    let pulldown = service.create_machine("Lat Pulldown", "").unwrap();
    service
        .log_exercise(date(2024, 1, 15), leg_press.id, &[row(80.0, 10)], "")
        .unwrap();
    service
        .log_exercise(date(2024, 1, 15), pulldown.id, &[row(40.0, 12)], "")
        .unwrap();

    assert_eq!(
        service.delete_machine(leg_press.id).unwrap(),
        Confirmed::Accepted(leg_press.id)
    );

    assert_eq!(service.get_machines().unwrap(), vec![pulldown.clone()]);
    let workouts = service.get_workouts().unwrap();
    assert_eq!(workouts[0].exercises.len(), 1);
    assert_eq!(workouts[0].exercises[0].machine_id, pulldown.id);
}

#[test]
fn test_delete_machine_declined_changes_nothing() {
    let service = domain::Service::new(
        DocumentStore::new(MemoryStore::new()),
        Always(Decision::Cancel),
    );
    let machine = service.create_machine("Leg Press", "").unwrap();

    assert_eq!(
        service.delete_machine(machine.id).unwrap(),
        Confirmed::Declined
    );
    assert_eq!(service.get_machines().unwrap(), vec![machine]);
}

#[test]
fn test_statistics_over_stored_history() {
    let service = service();
    let machine = service.create_machine("Leg Press", "").unwrap();
    service
        .log_exercise(date(2024, 1, 15), machine.id, &[row(80.0, 10)], "")
        .unwrap();
    service
        .log_exercise(date(2024, 1, 17), machine.id, &[row(85.0, 8)], "")
        .unwrap();

    let statistics = service.get_statistics().unwrap();

    let stats = &statistics[&machine.id];
    assert_eq!(stats.workout_count, 2);
    assert_eq!(stats.last_workout_date, date(2024, 1, 17));
    assert_eq!(stats.time_series().len(), 2);
}

#[test]
fn test_export_import_between_stores() {
    let service = service();
    let machine = service.create_machine("Leg Press", "a1B2c3").unwrap();
    service
        .log_exercise(date(2024, 1, 15), machine.id, &[row(80.0, 10)], "notes")
        .unwrap();
    let exported = service.export_data().unwrap();

    let raw = Archive::from(&exported).to_json().unwrap();
    let restored = domain::DataExport::from(Archive::from_json(&raw).unwrap());

    let other = domain::Service::new(
        DocumentStore::new(MemoryStore::new()),
        Always(Decision::Proceed),
    );
    assert_eq!(other.import_data(restored).unwrap(), Confirmed::Accepted(()));
    assert_eq!(other.export_data().unwrap(), exported);
}

#[test]
fn test_clear_all_removes_documents() {
    let service = service();
    let machine = service.create_machine("Leg Press", "").unwrap();
    service
        .log_exercise(date(2024, 1, 15), machine.id, &[row(80.0, 10)], "")
        .unwrap();

    assert_eq!(service.clear_all().unwrap(), Confirmed::Accepted(()));
    assert_eq!(service.get_machines().unwrap(), vec![]);
    assert_eq!(service.get_workouts().unwrap(), vec![]);
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn row(weight: f32, reps: u32) -> domain::SetInput {
    domain::SetInput { weight, reps }
}
