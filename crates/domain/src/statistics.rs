//! Aggregate per-machine statistics derived from the full workout history.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::{ExerciseEntry, MachineID, ReadError, Set, WorkoutRecord};

pub const MAX_PERSONAL_RECORDS: usize = 3;

pub trait StatisticsService {
    fn get_statistics(&self) -> Result<BTreeMap<MachineID, MachineStatistics>, ReadError>;
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Interval {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl From<std::ops::RangeInclusive<NaiveDate>> for Interval {
    fn from(value: std::ops::RangeInclusive<NaiveDate>) -> Self {
        Interval {
            first: *value.start(),
            last: *value.end(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MachineStatistics {
    pub name: String,
    pub image: Option<String>,
    pub total_volume: f32,
    pub total_reps: u64,
    pub heaviest_set: Option<Set>,
    pub workout_count: u64,
    pub last_workout_date: NaiveDate,
    pub personal_records: Vec<PersonalRecord>,
    pub daily: BTreeMap<NaiveDate, DailyPerformance>,
}

impl MachineStatistics {
    fn new(entry: &ExerciseEntry) -> Self {
        Self {
            name: entry.display_name().to_string(),
            image: entry.machine_image.clone(),
            total_volume: 0.0,
            total_reps: 0,
            heaviest_set: None,
            workout_count: 0,
            last_workout_date: NaiveDate::MIN,
            personal_records: Vec::new(),
            daily: BTreeMap::new(),
        }
    }

    /// Chartable per-date points in ascending date order.
    ///
    /// Empty when fewer than two distinct dates have been logged, as a single
    /// point is insufficient to plot a trend.
    #[must_use]
    pub fn time_series(&self) -> Vec<(NaiveDate, DailyPerformance)> {
        if self.daily.len() < 2 {
            return Vec::new();
        }

        self.daily
            .iter()
            .map(|(date, performance)| (*date, *performance))
            .collect()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DailyPerformance {
    pub volume: f32,
    pub set_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonalRecord {
    pub set: Set,
    pub date: NaiveDate,
}

/// Folds the full workout history into per-machine summaries.
///
/// A pure full recompute on every call: no state is kept between calls and
/// the input is never modified. Buckets are seeded from the first entry seen
/// for a machine, so the display name and image reflect the stored snapshot
/// when the machine itself no longer exists.
#[must_use]
pub fn compute_all(workouts: &[WorkoutRecord]) -> BTreeMap<MachineID, MachineStatistics> {
    let mut statistics: BTreeMap<MachineID, MachineStatistics> = BTreeMap::new();
    let mut candidates: BTreeMap<MachineID, Vec<PersonalRecord>> = BTreeMap::new();

    for record in workouts {
        for entry in &record.exercises {
            let stats = statistics
                .entry(entry.machine_id)
                .or_insert_with(|| MachineStatistics::new(entry));

            stats.workout_count += 1;
            stats.last_workout_date = stats.last_workout_date.max(record.date);
            stats.daily.entry(record.date).or_default();

            for set in &entry.sets {
                let volume = set.volume();
                stats.total_volume += volume;
                stats.total_reps += u64::from(u32::from(set.reps));

                if let Some(daily) = stats.daily.get_mut(&record.date) {
                    daily.volume += volume;
                    daily.set_count += 1;
                }

                if improves_on(*set, stats.heaviest_set) {
                    stats.heaviest_set = Some(*set);
                }

                candidates
                    .entry(entry.machine_id)
                    .or_default()
                    .push(PersonalRecord {
                        set: *set,
                        date: record.date,
                    });
            }
        }
    }

    for (machine_id, candidates) in candidates {
        if let Some(stats) = statistics.get_mut(&machine_id) {
            stats.personal_records = ranked_records(candidates);
        }
    }

    statistics
}

/// A set takes the heaviest-set slot if its weight is strictly greater, or
/// equal with strictly more reps.
fn improves_on(challenger: Set, current: Option<Set>) -> bool {
    match current {
        None => true,
        Some(current) => {
            challenger.weight > current.weight
                || (challenger.weight == current.weight && challenger.reps > current.reps)
        }
    }
}

/// Ranks personal-record candidates by date descending, ties broken by
/// volume descending, keeps the first occurrence per exact (weight, reps)
/// pair and caps the result.
fn ranked_records(mut candidates: Vec<PersonalRecord>) -> Vec<PersonalRecord> {
    candidates.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.set.volume().total_cmp(&a.set.volume()))
    });

    let mut seen: BTreeSet<(u32, u32)> = BTreeSet::new();
    let mut records = Vec::new();

    for candidate in candidates {
        let key = (
            f32::from(candidate.set.weight).to_bits(),
            u32::from(candidate.set.reps),
        );
        if !seen.insert(key) {
            continue;
        }
        records.push(candidate);
        if records.len() == MAX_PERSONAL_RECORDS {
            break;
        }
    }

    records
}
