#![allow(clippy::missing_errors_doc)]

use chrono::NaiveDate;
use flextrack_domain as domain;
use log::error;
use strum::AsRefStr;
use uuid::Uuid;

use super::KeyValueStore;

/// Persistence over two JSON documents in a key-value store. Each write
/// replaces a whole document. Missing and unparseable documents read as
/// empty, so a fresh or damaged store never blocks the application.
pub struct DocumentStore<S> {
    store: S,
}

#[derive(AsRefStr)]
pub enum Key {
    #[strum(serialize = "flextrack_machines_v1")]
    Machines,
    #[strum(serialize = "flextrack_workouts_v1")]
    Workouts,
}

impl<S: KeyValueStore> DocumentStore<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Bytes occupied by both documents.
    pub fn approximate_size(&self) -> Result<usize, domain::StorageError> {
        let mut size = 0;
        for key in [Key::Machines, Key::Workouts] {
            if let Some(raw) = self.store.get(key.as_ref())? {
                size += raw.len();
            }
        }
        Ok(size)
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: Key) -> Result<Vec<T>, domain::ReadError> {
        let Some(raw) = self.store.get(key.as_ref())? else {
            return Ok(vec![]);
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                error!("failed to parse document {}: {err}", key.as_ref());
                Ok(vec![])
            }
        }
    }

    fn write<T: serde::Serialize>(&self, key: Key, items: &[T]) -> Result<(), domain::StorageError> {
        let raw = serde_json::to_string(items)
            .map_err(|err| domain::StorageError::Other(Box::new(err)))?;
        self.store.set(key.as_ref(), &raw)
    }
}

impl<S: KeyValueStore> domain::MachineRepository for DocumentStore<S> {
    fn read_machines(&self) -> Result<Vec<domain::Machine>, domain::ReadError> {
        Ok(self
            .read::<Machine>(Key::Machines)?
            .into_iter()
            .filter_map(|machine| match domain::Machine::try_from(machine) {
                Ok(machine) => Some(machine),
                Err(err) => {
                    error!("dropped stored machine: {err}");
                    None
                }
            })
            .collect())
    }

    fn write_machines(&self, machines: &[domain::Machine]) -> Result<(), domain::StorageError> {
        self.write(
            Key::Machines,
            &machines.iter().map(Machine::from).collect::<Vec<_>>(),
        )
    }

    fn clear_machines(&self) -> Result<(), domain::StorageError> {
        self.store.remove(Key::Machines.as_ref())
    }
}

impl<S: KeyValueStore> domain::WorkoutRepository for DocumentStore<S> {
    fn read_workouts(&self) -> Result<Vec<domain::WorkoutRecord>, domain::ReadError> {
        Ok(self
            .read::<WorkoutRecord>(Key::Workouts)?
            .into_iter()
            .map(domain::WorkoutRecord::from)
            .collect())
    }

    fn write_workouts(&self, workouts: &[domain::WorkoutRecord]) -> Result<(), domain::StorageError> {
        self.write(
            Key::Workouts,
            &workouts.iter().map(WorkoutRecord::from).collect::<Vec<_>>(),
        )
    }

    fn clear_workouts(&self) -> Result<(), domain::StorageError> {
        self.store.remove(Key::Workouts.as_ref())
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Machine {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
}

impl From<&domain::Machine> for Machine {
    fn from(value: &domain::Machine) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            image: value.image.clone(),
        }
    }
}

impl TryFrom<Machine> for domain::Machine {
    type Error = domain::NameError;

    fn try_from(value: Machine) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            image: value.image,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutRecord {
    pub date: NaiveDate,
    pub exercises: Vec<ExerciseEntry>,
}

impl From<&domain::WorkoutRecord> for WorkoutRecord {
    fn from(value: &domain::WorkoutRecord) -> Self {
        Self {
            date: value.date,
            exercises: value.exercises.iter().map(ExerciseEntry::from).collect(),
        }
    }
}

impl From<WorkoutRecord> for domain::WorkoutRecord {
    fn from(value: WorkoutRecord) -> Self {
        Self {
            date: value.date,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::ExerciseEntry::from)
                .collect(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub machine_id: Uuid,
    pub machine_name: String,
    pub machine_image: Option<String>,
    pub sets: Vec<Set>,
    pub notes: String,
}

impl From<&domain::ExerciseEntry> for ExerciseEntry {
    fn from(value: &domain::ExerciseEntry) -> Self {
        Self {
            machine_id: *value.machine_id,
            machine_name: value.machine_name.clone(),
            machine_image: value.machine_image.clone(),
            sets: value.sets.iter().map(Set::from).collect(),
            notes: value.notes.clone(),
        }
    }
}

impl From<ExerciseEntry> for domain::ExerciseEntry {
    fn from(value: ExerciseEntry) -> Self {
        Self {
            machine_id: value.machine_id.into(),
            machine_name: value.machine_name,
            machine_image: value.machine_image,
            sets: value
                .sets
                .into_iter()
                .filter_map(|set| match domain::Set::try_from(set) {
                    Ok(set) => Some(set),
                    Err(err) => {
                        error!("dropped stored set: {err}");
                        None
                    }
                })
                .collect(),
            notes: value.notes,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Set {
    pub weight: f32,
    pub reps: u32,
}

impl From<&domain::Set> for Set {
    fn from(value: &domain::Set) -> Self {
        Self {
            weight: f32::from(value.weight),
            reps: u32::from(value.reps),
        }
    }
}

impl TryFrom<Set> for domain::Set {
    type Error = SetError;

    fn try_from(value: Set) -> Result<Self, Self::Error> {
        Ok(Self {
            weight: domain::Weight::new(value.weight)?,
            reps: domain::Reps::new(value.reps)?,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetError {
    #[error(transparent)]
    InvalidWeight(#[from] domain::WeightError),
    #[error(transparent)]
    InvalidReps(#[from] domain::RepsError),
}
