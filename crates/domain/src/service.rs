use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, error};

use crate::{
    Confirmation, Confirmed, CreateError, Decision, DeleteError, ExerciseConflict, ExerciseEntry,
    Interval, LogOutcome, Machine, MachineID, MachineRepository, MachineService, MachineStatistics,
    Name, Prompt, ReadError, Resolution, Set, SetInput, StatisticsService, UpdateError,
    ValidationError, WorkoutRecord, WorkoutRepository, WorkoutService, compute_all, image,
    remove_machine_entries, valid_sets,
};

/// A full data snapshot as produced by export and consumed by import.
#[derive(Debug, Clone, PartialEq)]
pub struct DataExport {
    pub machines: Vec<Machine>,
    pub workouts: Vec<WorkoutRecord>,
}

pub struct Service<R, C> {
    repository: R,
    confirmation: C,
}

impl<R, C> Service<R, C>
where
    R: MachineRepository + WorkoutRepository,
    C: Confirmation,
{
    pub fn new(repository: R, confirmation: C) -> Self {
        Self {
            repository,
            confirmation,
        }
    }
}

macro_rules! log_on_error {
    ($func: expr, $action: literal, $entity: literal) => {{
        let result = $func;
        if let Err(ref err) = result {
            error!("failed to {} {}: {err}", $action, $entity);
        }
        result
    }};
}

impl<R, C> Service<R, C>
where
    R: MachineRepository + WorkoutRepository,
    C: Confirmation,
{
    pub fn export_data(&self) -> Result<DataExport, ReadError> {
        Ok(DataExport {
            machines: self.get_machines()?,
            workouts: self.get_workouts()?,
        })
    }

    pub fn import_data(&self, data: DataExport) -> Result<Confirmed<()>, UpdateError> {
        log_on_error!(self.overwrite_all(data), "import", "data")
    }

    pub fn clear_all(&self) -> Result<Confirmed<()>, DeleteError> {
        log_on_error!(self.clear_data(), "clear", "all data")
    }

    /// All machines with stored image references re-normalized, so stale raw
    /// input is canonicalized on read, not just on write.
    fn refreshed_machines(&self) -> Result<Vec<Machine>, ReadError> {
        let mut machines = self.repository.read_machines()?;
        for machine in &mut machines {
            machine.image = machine.image.as_deref().and_then(image::normalize);
        }
        Ok(machines)
    }

    /// All records with each entry's snapshot fields refreshed from the live
    /// machine when it still exists. Entries of deleted machines keep the
    /// stored snapshot, with the image re-normalized.
    fn refreshed_workouts(&self) -> Result<Vec<WorkoutRecord>, ReadError> {
        let machines = self.refreshed_machines()?;
        let mut workouts = self.repository.read_workouts()?;
        for record in &mut workouts {
            for entry in &mut record.exercises {
                if let Some(machine) = machines.iter().find(|m| m.id == entry.machine_id) {
                    entry.machine_name = machine.name.to_string();
                    entry.machine_image = machine.image.clone();
                } else {
                    entry.machine_image =
                        entry.machine_image.as_deref().and_then(image::normalize);
                }
            }
        }
        Ok(workouts)
    }

    fn snapshot_entry(machine: &Machine, sets: Vec<Set>, notes: &str) -> ExerciseEntry {
        ExerciseEntry {
            machine_id: machine.id,
            machine_name: machine.name.to_string(),
            machine_image: machine.image.clone(),
            sets,
            notes: notes.trim().to_string(),
        }
    }

    fn add_machine(&self, name: &str, image: &str) -> Result<Machine, CreateError> {
        let name = Name::new(name).map_err(ValidationError::from)?;

        let image = image.trim();
        let image = if image.is_empty() {
            None
        } else {
            match image::normalize(image) {
                Some(normalized) => Some(normalized),
                None => return Err(ValidationError::InvalidImage.into()),
            }
        };

        let mut machines = self.repository.read_machines()?;
        let lowered = name.as_ref().to_lowercase();
        if machines
            .iter()
            .any(|m| m.name.as_ref().to_lowercase() == lowered)
        {
            return Err(CreateError::Duplicate(name.to_string()));
        }

        let machine = Machine {
            id: MachineID::random(),
            name,
            image,
        };
        machines.push(machine.clone());
        self.repository.write_machines(&machines)?;
        debug!("created machine {} ({})", machine.name, *machine.id);

        Ok(machine)
    }

    fn remove_machine(&self, id: MachineID) -> Result<Confirmed<MachineID>, DeleteError> {
        let machines = self.repository.read_machines()?;
        let Some(machine) = machines.iter().find(|m| m.id == id) else {
            return Err(DeleteError::NotFound);
        };

        let prompt = Prompt {
            title: "Delete Machine",
            message: format!(
                "Are you sure you want to delete \"{}\"? All workout entries for this machine will also be removed.",
                machine.name
            ),
        };
        if self.confirmation.confirm(&prompt) == Decision::Cancel {
            return Ok(Confirmed::Declined);
        }

        let machines = machines
            .into_iter()
            .filter(|m| m.id != id)
            .collect::<Vec<_>>();
        self.repository.write_machines(&machines)?;

        let mut workouts = self.repository.read_workouts()?;
        let removed = remove_machine_entries(&mut workouts, id);
        self.repository.write_workouts(&workouts)?;
        debug!("deleted machine {} and {removed} workout entries", *id);

        Ok(Confirmed::Accepted(id))
    }

    fn overwrite_machines(&self, mut machines: Vec<Machine>) -> Result<(), UpdateError> {
        for machine in &mut machines {
            machine.image = machine.image.as_deref().and_then(image::normalize);
        }
        self.repository.write_machines(&machines)?;
        Ok(())
    }

    fn insert_exercise(
        &self,
        date: NaiveDate,
        machine_id: MachineID,
        sets: &[SetInput],
        notes: &str,
    ) -> Result<LogOutcome, CreateError> {
        let machine = self
            .refreshed_machines()?
            .into_iter()
            .find(|m| m.id == machine_id)
            .ok_or(ValidationError::UnknownMachine)?;

        let sets = valid_sets(sets);
        if sets.is_empty() {
            return Err(ValidationError::NoValidSets.into());
        }

        let proposed = Self::snapshot_entry(&machine, sets, notes);
        let mut workouts = self.refreshed_workouts()?;

        if let Some(record) = workouts.iter_mut().find(|r| r.date == date) {
            if let Some(existing) = record.entry(machine_id) {
                debug!("conflicting entry for machine {} on {date}", *machine_id);
                return Ok(LogOutcome::Conflict(ExerciseConflict {
                    date,
                    existing: existing.clone(),
                    proposed,
                }));
            }
            record.exercises.push(proposed.clone());
        } else {
            workouts.push(WorkoutRecord {
                date,
                exercises: vec![proposed.clone()],
            });
        }

        self.repository.write_workouts(&workouts)?;
        debug!("logged exercise for machine {} on {date}", *machine_id);

        Ok(LogOutcome::Logged(proposed))
    }

    fn apply_resolution(
        &self,
        conflict: ExerciseConflict,
        resolution: Resolution,
    ) -> Result<ExerciseEntry, UpdateError> {
        let ExerciseConflict { date, proposed, .. } = conflict;
        let machine_id = proposed.machine_id;

        let mut workouts = self.refreshed_workouts()?;
        let record = workouts
            .iter_mut()
            .find(|r| r.date == date)
            .ok_or(UpdateError::NotFound)?;
        let index = record.position(machine_id).ok_or(UpdateError::NotFound)?;

        match resolution {
            Resolution::Replace => record.exercises[index] = proposed,
            Resolution::Merge => record.exercises[index].merge(proposed),
        }
        let entry = record.exercises[index].clone();

        self.repository.write_workouts(&workouts)?;
        debug!("resolved entry conflict for machine {} on {date}", *machine_id);

        Ok(entry)
    }

    fn modify_exercise(
        &self,
        date: NaiveDate,
        index: usize,
        machine_id: MachineID,
        sets: &[SetInput],
        notes: &str,
    ) -> Result<ExerciseEntry, UpdateError> {
        let machine = self
            .refreshed_machines()?
            .into_iter()
            .find(|m| m.id == machine_id)
            .ok_or(ValidationError::UnknownMachine)?;

        let sets = valid_sets(sets);
        if sets.is_empty() {
            return Err(ValidationError::NoValidSets.into());
        }

        let mut workouts = self.refreshed_workouts()?;
        let record = workouts
            .iter_mut()
            .find(|r| r.date == date)
            .ok_or(UpdateError::NotFound)?;
        if index >= record.exercises.len() {
            return Err(UpdateError::NotFound);
        }
        if record
            .exercises
            .iter()
            .enumerate()
            .any(|(i, e)| i != index && e.machine_id == machine_id)
        {
            return Err(UpdateError::Conflict(machine.name.to_string()));
        }

        let entry = Self::snapshot_entry(&machine, sets, notes);
        record.exercises[index] = entry.clone();

        self.repository.write_workouts(&workouts)?;
        debug!("updated exercise {index} on {date}");

        Ok(entry)
    }

    fn remove_exercise(&self, date: NaiveDate, index: usize) -> Result<(), DeleteError> {
        let mut workouts = self.refreshed_workouts()?;
        let position = workouts
            .iter()
            .position(|r| r.date == date)
            .ok_or(DeleteError::NotFound)?;
        if index >= workouts[position].exercises.len() {
            return Err(DeleteError::NotFound);
        }

        workouts[position].exercises.remove(index);
        if workouts[position].exercises.is_empty() {
            workouts.remove(position);
        }

        self.repository.write_workouts(&workouts)?;
        debug!("deleted exercise {index} on {date}");

        Ok(())
    }

    fn overwrite_workouts(&self, mut workouts: Vec<WorkoutRecord>) -> Result<(), UpdateError> {
        for record in &mut workouts {
            for entry in &mut record.exercises {
                entry.machine_image = entry.machine_image.as_deref().and_then(image::normalize);
            }
        }
        self.repository.write_workouts(&workouts)?;
        Ok(())
    }

    fn overwrite_all(&self, data: DataExport) -> Result<Confirmed<()>, UpdateError> {
        let prompt = Prompt {
            title: "Import Data",
            message: "Importing will overwrite all existing machines and workouts. Continue?"
                .to_string(),
        };
        if self.confirmation.confirm(&prompt) == Decision::Cancel {
            return Ok(Confirmed::Declined);
        }

        self.overwrite_machines(data.machines)?;
        self.overwrite_workouts(data.workouts)?;
        debug!("imported data");

        Ok(Confirmed::Accepted(()))
    }

    fn clear_data(&self) -> Result<Confirmed<()>, DeleteError> {
        let prompt = Prompt {
            title: "Clear All Data",
            message: "Are you sure you want to delete all machines and workouts? This cannot be undone."
                .to_string(),
        };
        if self.confirmation.confirm(&prompt) == Decision::Cancel {
            return Ok(Confirmed::Declined);
        }

        self.repository.clear_machines()?;
        self.repository.clear_workouts()?;
        debug!("cleared all data");

        Ok(Confirmed::Accepted(()))
    }
}

impl<R, C> MachineService for Service<R, C>
where
    R: MachineRepository + WorkoutRepository,
    C: Confirmation,
{
    fn get_machines(&self) -> Result<Vec<Machine>, ReadError> {
        log_on_error!(self.refreshed_machines(), "get", "machines")
    }

    fn get_machine(&self, id: MachineID) -> Result<Machine, ReadError> {
        self.get_machines()?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or(ReadError::NotFound)
    }

    fn create_machine(&self, name: &str, image: &str) -> Result<Machine, CreateError> {
        log_on_error!(self.add_machine(name, image), "create", "machine")
    }

    fn delete_machine(&self, id: MachineID) -> Result<Confirmed<MachineID>, DeleteError> {
        log_on_error!(self.remove_machine(id), "delete", "machine")
    }

    fn replace_machines(&self, machines: Vec<Machine>) -> Result<(), UpdateError> {
        log_on_error!(self.overwrite_machines(machines), "replace", "machines")
    }
}

impl<R, C> WorkoutService for Service<R, C>
where
    R: MachineRepository + WorkoutRepository,
    C: Confirmation,
{
    fn get_workouts(&self) -> Result<Vec<WorkoutRecord>, ReadError> {
        log_on_error!(self.refreshed_workouts(), "get", "workouts")
    }

    fn get_workout_on(&self, date: NaiveDate) -> Result<WorkoutRecord, ReadError> {
        self.get_workouts()?
            .into_iter()
            .find(|record| record.date == date)
            .ok_or(ReadError::NotFound)
    }

    fn get_workouts_in(&self, interval: &Interval) -> Result<Vec<WorkoutRecord>, ReadError> {
        let mut workouts = self
            .get_workouts()?
            .into_iter()
            .filter(|record| (interval.first..=interval.last).contains(&record.date))
            .collect::<Vec<_>>();
        workouts.sort_by_key(|record| record.date);
        Ok(workouts)
    }

    fn log_exercise(
        &self,
        date: NaiveDate,
        machine_id: MachineID,
        sets: &[SetInput],
        notes: &str,
    ) -> Result<LogOutcome, CreateError> {
        log_on_error!(
            self.insert_exercise(date, machine_id, sets, notes),
            "log",
            "exercise"
        )
    }

    fn resolve_conflict(
        &self,
        conflict: ExerciseConflict,
        resolution: Resolution,
    ) -> Result<ExerciseEntry, UpdateError> {
        log_on_error!(
            self.apply_resolution(conflict, resolution),
            "resolve",
            "exercise conflict"
        )
    }

    fn update_exercise(
        &self,
        date: NaiveDate,
        index: usize,
        machine_id: MachineID,
        sets: &[SetInput],
        notes: &str,
    ) -> Result<ExerciseEntry, UpdateError> {
        log_on_error!(
            self.modify_exercise(date, index, machine_id, sets, notes),
            "update",
            "exercise"
        )
    }

    fn delete_exercise(&self, date: NaiveDate, index: usize) -> Result<(), DeleteError> {
        log_on_error!(self.remove_exercise(date, index), "delete", "exercise")
    }

    fn replace_workouts(&self, workouts: Vec<WorkoutRecord>) -> Result<(), UpdateError> {
        log_on_error!(self.overwrite_workouts(workouts), "replace", "workouts")
    }
}

impl<R, C> StatisticsService for Service<R, C>
where
    R: MachineRepository + WorkoutRepository,
    C: Confirmation,
{
    fn get_statistics(&self) -> Result<BTreeMap<MachineID, MachineStatistics>, ReadError> {
        Ok(compute_all(&self.get_workouts()?))
    }
}
