//! Department directories.

use intake_core::{async_trait, Department, DepartmentDirectory, ServiceError};

/// A directory backed by a fixed list.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    departments: Vec<Department>,
}

impl StaticDirectory {
    pub fn new(departments: Vec<Department>) -> Self {
        Self { departments }
    }

    /// The departments the chat flow expects by default.
    pub fn municipal() -> Self {
        Self::new(vec![
            Department::new("BBMP", "Bruhat Bengaluru Mahanagara Palike"),
            Department::new("BESCOM", "Bangalore Electricity Supply Company"),
            Department::new("PW", "Public Works"),
            Department::new("PW-SUB", "Public Works - Roads"),
            Department::new("PD", "Police Department"),
        ])
    }
}

#[async_trait]
impl DepartmentDirectory for StaticDirectory {
    async fn list_departments(&self) -> Result<Vec<Department>, ServiceError> {
        Ok(self.departments.clone())
    }
}

/// A directory that is always unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingDirectory;

#[async_trait]
impl DepartmentDirectory for FailingDirectory {
    async fn list_departments(&self) -> Result<Vec<Department>, ServiceError> {
        Err(ServiceError::Unavailable("directory offline".to_string()))
    }
}
