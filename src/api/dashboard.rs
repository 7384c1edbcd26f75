use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use super::{PeriodQuery, PeriodView};
use crate::auth::session::Session;
use crate::dashboard::DashboardMetrics;
use crate::error::AppError;
use crate::models::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardView {
    pub period: PeriodView,
    pub metrics: DashboardMetrics,
}

/// Dashboard
///
/// Counts and amounts over the employees of one month. Without a period
/// the current month is used.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Metrics of the period", body = DashboardView),
        (status = 400, description = "Invalid month"),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
pub async fn dashboard(
    session: Session,
    state: web::Data<AppState>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let period = query.resolve()?;
    let employees = state
        .backend
        .session(Some(&session.token))
        .list_employees_with_payrolls(period)
        .await
        .map_err(AppError::backend("Erro ao carregar dados do dashboard"))?;

    let metrics = DashboardMetrics::compute(&employees);
    debug!(period = %period, employees = metrics.total_employees, paid = metrics.paid, "Dashboard computed");

    Ok(HttpResponse::Ok().json(ApiResult::ok(DashboardView {
        period: period.into(),
        metrics,
    })))
}
