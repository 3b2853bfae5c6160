#![allow(clippy::missing_errors_doc)]

use chrono::NaiveDate;
use flextrack_domain as domain;
use log::error;

use crate::document;

/// A complete snapshot of machines and workouts in the interchange format
/// written by export and read back by import.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Archive {
    pub machines: Vec<document::Machine>,
    pub workouts: Vec<document::WorkoutRecord>,
}

impl Archive {
    pub fn from_json(raw: &str) -> Result<Self, ArchiveError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, ArchiveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    #[error("invalid archive: {0}")]
    Invalid(#[from] serde_json::Error),
}

impl From<&domain::DataExport> for Archive {
    fn from(value: &domain::DataExport) -> Self {
        Self {
            machines: value.machines.iter().map(document::Machine::from).collect(),
            workouts: value
                .workouts
                .iter()
                .map(document::WorkoutRecord::from)
                .collect(),
        }
    }
}

impl From<Archive> for domain::DataExport {
    fn from(value: Archive) -> Self {
        Self {
            machines: value
                .machines
                .into_iter()
                .filter_map(|machine| match domain::Machine::try_from(machine) {
                    Ok(machine) => Some(machine),
                    Err(err) => {
                        error!("dropped archived machine: {err}");
                        None
                    }
                })
                .collect(),
            workouts: value
                .workouts
                .into_iter()
                .map(domain::WorkoutRecord::from)
                .collect(),
        }
    }
}

/// Suggested name for a backup file written on `date`.
#[must_use]
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("flextrack_backup_{date}.json")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::tests::data::{MACHINES, WORKOUT, WORKOUT_2, WORKOUTS};

    use super::*;

    #[test]
    fn test_round_trip() {
        let export = domain::DataExport {
            machines: MACHINES.to_vec(),
            workouts: WORKOUTS.to_vec(),
        };

        let raw = Archive::from(&export).to_json().unwrap();
        let restored = domain::DataExport::from(Archive::from_json(&raw).unwrap());

        assert_eq!(restored, export);
    }

    #[test]
    fn test_to_json_is_readable() {
        let export = domain::DataExport {
            machines: MACHINES.to_vec(),
            workouts: vec![WORKOUT_2.clone()],
        };

        let raw = Archive::from(&export).to_json().unwrap();

        assert!(raw.contains("\n  \"machines\""));
        assert!(raw.contains("\n  \"workouts\""));
    }

    #[test]
    fn test_from_json_rejects_missing_key() {
        let raw = json!({"machines": []}).to_string();

        assert!(matches!(
            Archive::from_json(&raw),
            Err(ArchiveError::Invalid(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        assert!(Archive::from_json("{not json").is_err());
    }

    #[test]
    fn test_from_json_accepts_empty_collections() {
        let raw = json!({"machines": [], "workouts": []}).to_string();

        let export = domain::DataExport::from(Archive::from_json(&raw).unwrap());

        assert_eq!(export.machines, vec![]);
        assert_eq!(export.workouts, vec![]);
    }

    #[test]
    fn test_invalid_machine_is_dropped() {
        let raw = json!({
            "machines": [
                {
                    "id": "00000000-0000-0000-0000-000000000001",
                    "name": " ",
                    "image": null
                }
            ],
            "workouts": []
        })
        .to_string();

        let export = domain::DataExport::from(Archive::from_json(&raw).unwrap());

        assert_eq!(export.machines, vec![]);
    }

    #[test]
    fn test_archive_format() {
        let export = domain::DataExport {
            machines: vec![],
            workouts: vec![WORKOUT.clone()],
        };

        let raw = Archive::from(&export).to_json().unwrap();

        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&raw).unwrap(),
            json!({
                "machines": [],
                "workouts": [
                    {
                        "date": "2024-01-15",
                        "exercises": [
                            {
                                "machineId": "00000000-0000-0000-0000-000000000001",
                                "machineName": "Leg Press",
                                "machineImage": "https://i.imgur.com/a1B2c3.jpeg",
                                "sets": [
                                    {"weight": 80.0, "reps": 10},
                                    {"weight": 85.0, "reps": 8}
                                ],
                                "notes": "felt strong"
                            },
                            {
                                "machineId": "00000000-0000-0000-0000-000000000002",
                                "machineName": "Lat Pulldown",
                                "machineImage": null,
                                "sets": [
                                    {"weight": 40.0, "reps": 12}
                                ],
                                "notes": ""
                            }
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_backup_file_name() {
        assert_eq!(
            backup_file_name(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
            "flextrack_backup_2024-01-15.json"
        );
    }
}
