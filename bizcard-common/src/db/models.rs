//! Database models

use serde::{Deserialize, Serialize};

/// Employee directory entry
///
/// `email` is the natural key; every other field is overwritten on upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub designation: Option<String>,
    pub faculty: Option<String>,
    pub school: Option<String>,
}

impl Employee {
    /// Employee with only the required fields set
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            mobile: None,
            designation: None,
            faculty: None,
            school: None,
        }
    }
}

/// One page of a filtered listing plus the total match count
#[derive(Debug, Clone, Serialize)]
pub struct EmployeePage {
    pub employees: Vec<Employee>,
    pub total: i64,
}

/// Whether an upsert created a row or merged into an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}
