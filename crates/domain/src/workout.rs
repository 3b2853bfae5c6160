use chrono::NaiveDate;
use derive_more::{Display, Into};

use crate::{CreateError, DeleteError, Interval, MachineID, ReadError, StorageError, UpdateError};

pub const UNKNOWN_MACHINE: &str = "Unknown Machine";

pub trait WorkoutService {
    fn get_workouts(&self) -> Result<Vec<WorkoutRecord>, ReadError>;
    fn get_workout_on(&self, date: NaiveDate) -> Result<WorkoutRecord, ReadError>;
    fn get_workouts_in(&self, interval: &Interval) -> Result<Vec<WorkoutRecord>, ReadError>;
    fn log_exercise(
        &self,
        date: NaiveDate,
        machine_id: MachineID,
        sets: &[SetInput],
        notes: &str,
    ) -> Result<LogOutcome, CreateError>;
    fn resolve_conflict(
        &self,
        conflict: ExerciseConflict,
        resolution: Resolution,
    ) -> Result<ExerciseEntry, UpdateError>;
    fn update_exercise(
        &self,
        date: NaiveDate,
        index: usize,
        machine_id: MachineID,
        sets: &[SetInput],
        notes: &str,
    ) -> Result<ExerciseEntry, UpdateError>;
    fn delete_exercise(&self, date: NaiveDate, index: usize) -> Result<(), DeleteError>;
    fn replace_workouts(&self, workouts: Vec<WorkoutRecord>) -> Result<(), UpdateError>;
}

pub trait WorkoutRepository {
    fn read_workouts(&self) -> Result<Vec<WorkoutRecord>, ReadError>;
    fn write_workouts(&self, workouts: &[WorkoutRecord]) -> Result<(), StorageError>;
    fn clear_workouts(&self) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRecord {
    pub date: NaiveDate,
    pub exercises: Vec<ExerciseEntry>,
}

impl WorkoutRecord {
    #[must_use]
    pub fn entry(&self, machine_id: MachineID) -> Option<&ExerciseEntry> {
        self.exercises.iter().find(|e| e.machine_id == machine_id)
    }

    #[must_use]
    pub fn position(&self, machine_id: MachineID) -> Option<usize> {
        self.exercises.iter().position(|e| e.machine_id == machine_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseEntry {
    pub machine_id: MachineID,
    pub machine_name: String,
    pub machine_image: Option<String>,
    pub sets: Vec<Set>,
    pub notes: String,
}

impl ExerciseEntry {
    /// Display name of the machine backing this entry, falling back to a
    /// placeholder if the stored snapshot is empty.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.machine_name.is_empty() {
            UNKNOWN_MACHINE
        } else {
            &self.machine_name
        }
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.sets.iter().map(Set::volume).sum()
    }

    /// Extends the sets with those of `other`, preserving existing order
    /// before new order. Notes are overwritten only if `other` has any.
    pub fn merge(&mut self, other: ExerciseEntry) {
        self.sets.extend(other.sets);
        if !other.notes.is_empty() {
            self.notes = other.notes;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogOutcome {
    Logged(ExerciseEntry),
    Conflict(ExerciseConflict),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseConflict {
    pub date: NaiveDate,
    pub existing: ExerciseEntry,
    pub proposed: ExerciseEntry,
}

impl ExerciseConflict {
    #[must_use]
    pub fn machine_id(&self) -> MachineID {
        self.proposed.machine_id
    }

    #[must_use]
    pub fn machine_name(&self) -> &str {
        self.proposed.display_name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Replace,
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Set {
    pub weight: Weight,
    pub reps: Reps,
}

impl Set {
    #[must_use]
    pub fn volume(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        {
            f32::from(self.weight) * u32::from(self.reps) as f32
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetInput {
    pub weight: f32,
    pub reps: u32,
}

/// Keeps the rows that satisfy the numeric constraints and drops the rest.
#[must_use]
pub fn valid_sets(rows: &[SetInput]) -> Vec<Set> {
    rows.iter()
        .filter_map(|row| {
            let weight = Weight::new(row.weight).ok()?;
            let reps = Reps::new(row.reps).ok()?;
            Some(Set { weight, reps })
        })
        .collect()
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !value.is_finite() || value < 0.0 {
            return Err(WeightError::OutOfRange);
        }

        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be 0 or more")]
    OutOfRange,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if value == 0 {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be positive")]
    OutOfRange,
}

/// Strips every entry referencing `machine_id` from every record and prunes
/// records left without entries. Returns the number of removed entries.
pub fn remove_machine_entries(records: &mut Vec<WorkoutRecord>, machine_id: MachineID) -> usize {
    let mut removed = 0;
    for record in records.iter_mut() {
        let before = record.exercises.len();
        record.exercises.retain(|e| e.machine_id != machine_id);
        removed += before - record.exercises.len();
    }
    records.retain(|r| !r.exercises.is_empty());
    removed
}
