use derive_more::Deref;
use uuid::Uuid;

use crate::{Confirmed, CreateError, DeleteError, Name, ReadError, StorageError, UpdateError};

pub trait MachineService {
    fn get_machines(&self) -> Result<Vec<Machine>, ReadError>;
    fn get_machine(&self, id: MachineID) -> Result<Machine, ReadError>;
    fn create_machine(&self, name: &str, image: &str) -> Result<Machine, CreateError>;
    fn delete_machine(&self, id: MachineID) -> Result<Confirmed<MachineID>, DeleteError>;
    fn replace_machines(&self, machines: Vec<Machine>) -> Result<(), UpdateError>;
}

pub trait MachineRepository {
    fn read_machines(&self) -> Result<Vec<Machine>, ReadError>;
    fn write_machines(&self, machines: &[Machine]) -> Result<(), StorageError>;
    fn clear_machines(&self) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    pub id: MachineID,
    pub name: Name,
    pub image: Option<String>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct MachineID(Uuid);

impl MachineID {
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for MachineID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for MachineID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}
