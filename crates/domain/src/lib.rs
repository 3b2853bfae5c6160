#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod image;

mod error;
mod machine;
mod name;
mod service;
mod session;
mod statistics;
mod workout;

pub use error::{CreateError, DeleteError, ReadError, StorageError, UpdateError, ValidationError};
pub use machine::{Machine, MachineID, MachineRepository, MachineService};
pub use name::{Name, NameError};
pub use service::{DataExport, Service};
pub use session::{Confirmation, Confirmed, Decision, Prompt, Session};
pub use statistics::{
    DailyPerformance, Interval, MAX_PERSONAL_RECORDS, MachineStatistics, PersonalRecord,
    StatisticsService, compute_all,
};
pub use workout::{
    ExerciseConflict, ExerciseEntry, LogOutcome, Reps, RepsError, Resolution, Set, SetInput,
    UNKNOWN_MACHINE, Weight, WeightError, WorkoutRecord, WorkoutRepository, WorkoutService,
    remove_machine_entries, valid_sets,
};
