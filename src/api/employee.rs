use actix_web::{HttpResponse, web};
use tracing::{debug, info};

use super::busy;
use crate::auth::session::Session;
use crate::error::AppError;
use crate::forms::Validate;
use crate::forms::employee::EmployeeForm;
use crate::model::employee::Employee;
use crate::models::ApiResult;
use crate::state::AppState;

async fn reload(state: &AppState, session: &Session) -> Result<Vec<Employee>, AppError> {
    state
        .backend
        .session(Some(&session.token))
        .list_employees()
        .await
        .map_err(AppError::backend("Erro ao carregar funcionários"))
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Every employee with its branch", body = [Employee]),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn list_employees(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let employees = reload(&state, &session).await?;
    debug!(count = employees.len(), "Employees loaded");
    Ok(HttpResponse::Ok().json(ApiResult::ok(employees)))
}

/// Create employee
///
/// Answers with the reloaded list.
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeeForm,
    responses(
        (status = 200, description = "Employee created", body = [Employee]),
        (status = 422, description = "Validation failed"),
        (status = 409, description = "Same submission still running")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn create_employee(
    session: Session,
    state: web::Data<AppState>,
    form: web::Json<EmployeeForm>,
) -> Result<HttpResponse, AppError> {
    let payload = form.into_inner().validate()?;
    let _guard = state
        .inflight
        .begin(format!("employee:create:{}", payload.name))
        .ok_or_else(busy)?;

    state
        .backend
        .session(Some(&session.token))
        .create_employee(&payload)
        .await
        .map_err(AppError::backend("Erro ao criar funcionário"))?;
    info!(name = %payload.name, filial = payload.filial, "Employee created");

    let employees = reload(&state, &session).await?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(employees)))
}

/// Update employee
///
/// Only the form fields are sent, so the employee's payrolls and other
/// relations are left untouched. Answers with the reloaded row.
#[utoipa::path(
    put,
    path = "/api/employees/{document_id}",
    params(("document_id" = String, Path, description = "Employee document id")),
    request_body = EmployeeForm,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 404, description = "Employee vanished after the update"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn update_employee(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Json<EmployeeForm>,
) -> Result<HttpResponse, AppError> {
    let document_id = path.into_inner();
    let payload = form.into_inner().validate()?;
    let _guard = state
        .inflight
        .begin(format!("employee:update:{document_id}"))
        .ok_or_else(busy)?;

    state
        .backend
        .session(Some(&session.token))
        .update_employee(&document_id, &payload)
        .await
        .map_err(AppError::backend("Erro ao atualizar funcionário"))?;
    info!(document_id = %document_id, "Employee updated");

    let employee = reload(&state, &session)
        .await?
        .into_iter()
        .find(|e| e.document_id == document_id)
        .ok_or_else(|| AppError::NotFound("Funcionário não encontrado".into()))?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(employee)))
}

/// Delete employee
#[utoipa::path(
    delete,
    path = "/api/employees/{document_id}",
    params(("document_id" = String, Path, description = "Employee document id")),
    responses(
        (status = 200, description = "Employee deleted; reloaded list", body = [Employee]),
        (status = 502, description = "Backend refused the delete")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn delete_employee(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let document_id = path.into_inner();
    let _guard = state
        .inflight
        .begin(format!("employee:delete:{document_id}"))
        .ok_or_else(busy)?;

    state
        .backend
        .session(Some(&session.token))
        .delete_employee(&document_id)
        .await
        .map_err(AppError::backend("Erro ao excluir funcionário"))?;
    info!(document_id = %document_id, "Employee deleted");

    let employees = reload(&state, &session).await?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(employees)))
}
