//! Directory listing and single-employee add

use axum::{
    extract::{Query, State},
    Extension, Form, Json,
};
use bizcard_common::db::{self, UpsertOutcome};
use bizcard_common::pagination::{Pagination, DEFAULT_PER_PAGE};
use bizcard_common::Employee;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AuthContext;
use crate::{ApiError, ApiResult, AppState};

/// Query parameters for the listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_per_page")]
    pub per_page: i64,

    /// Case-insensitive substring of the name
    pub name: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

/// Listing response; `total` counts all matches for client-side paging
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub employees: Vec<Employee>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// GET /api/employees?page&per_page&name
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse>> {
    let pagination = Pagination::new(query.page, query.per_page);
    let page = db::list(
        &state.db,
        query.name.as_deref(),
        pagination.page,
        pagination.per_page,
    )
    .await?;

    Ok(Json(ListResponse {
        employees: page.employees,
        total: page.total,
        page: pagination.page,
        per_page: pagination.per_page,
    }))
}

/// Form fields for a single add
#[derive(Debug, Default, Deserialize)]
pub struct AddEmployeeForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub designation: Option<String>,
    pub faculty: Option<String>,
    pub school: Option<String>,
}

impl AddEmployeeForm {
    /// Validate required fields and normalize blanks to `None`
    pub fn into_employee(self) -> ApiResult<Employee> {
        let name = non_blank(self.name);
        let email = non_blank(self.email);

        let (Some(name), Some(email)) = (name, email) else {
            return Err(ApiError::BadRequest("Name and email are required".to_string()));
        };

        Ok(Employee {
            name,
            email,
            mobile: non_blank(self.mobile),
            designation: non_blank(self.designation),
            faculty: non_blank(self.faculty),
            school: non_blank(self.school),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /add_employee
///
/// Upserts by email, so adding an existing email updates that record.
pub async fn add_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(form): Form<AddEmployeeForm>,
) -> ApiResult<Json<MessageResponse>> {
    let employee = form.into_employee()?;
    let outcome = db::upsert(&state.db, &employee).await?;

    info!(session = %auth.session, email = %employee.email, ?outcome, "Employee saved");

    let message = match outcome {
        UpsertOutcome::Inserted => "Employee added",
        UpsertOutcome::Updated => "Employee updated",
    };

    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_requires_name_and_email() {
        let form = AddEmployeeForm {
            name: Some("Jane".into()),
            ..Default::default()
        };
        assert!(matches!(form.into_employee(), Err(ApiError::BadRequest(_))));

        let form = AddEmployeeForm {
            name: Some("   ".into()),
            email: Some("j@example.edu".into()),
            ..Default::default()
        };
        assert!(matches!(form.into_employee(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_form_blanks_become_none() {
        let form = AddEmployeeForm {
            name: Some(" Jane Doe ".into()),
            email: Some("j@example.edu".into()),
            mobile: Some("".into()),
            designation: Some("Lecturer".into()),
            ..Default::default()
        };
        let employee = form.into_employee().unwrap();
        assert_eq!(employee.name, "Jane Doe");
        assert_eq!(employee.mobile, None);
        assert_eq!(employee.designation.as_deref(), Some("Lecturer"));
        assert_eq!(employee.school, None);
    }
}
