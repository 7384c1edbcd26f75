use std::path::Path;

use actix_web::http::header::{
    Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::{error, info, warn};
use utoipa::{IntoParams, ToSchema};

use super::{PeriodQuery, PeriodView, busy};
use crate::auth::session::Session;
use crate::backend::ApiError;
use crate::dashboard::UNLABELED;
use crate::error::AppError;
use crate::forms::Validate;
use crate::forms::payroll::{CreatePayrollForm, EditPayrollForm, MarkAsPaidForm};
use crate::model::employee::Employee;
use crate::model::payroll::Payroll;
use crate::model::period::Period;
use crate::models::ApiResult;
use crate::receipt::{self, Receipt, ReceiptFileName};
use crate::state::AppState;
use crate::utils::currency::format_brl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, Display)]
pub enum PayrollStatus {
    #[serde(rename = "Pago")]
    #[strum(serialize = "Pago")]
    Paid,
    #[serde(rename = "Pendente")]
    #[strum(serialize = "Pendente")]
    Pending,
    #[serde(rename = "Sem folha")]
    #[strum(serialize = "Sem folha")]
    Missing,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRow {
    pub employee_document_id: String,
    pub name: String,
    /// First two words of the name.
    pub short_name: String,
    pub responsibility: Option<String>,
    pub payroll: Option<Payroll>,
    pub status: PayrollStatus,
    #[schema(example = "R$ 1.234,56")]
    pub total_display: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollGroup {
    pub filial_id: Option<u64>,
    pub filial_name: String,
    pub rows: Vec<PayrollRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PayrollTable {
    pub period: PeriodView,
    pub groups: Vec<PayrollGroup>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReceiptQuery {
    /// Employee document id
    pub employee_id: String,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BranchReceiptsQuery {
    /// Branch document id or numeric id
    pub filial_id: String,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptEntry {
    pub employee_document_id: String,
    pub employee_name: String,
    #[schema(example = "Recibo_João_Da_Silva_MARÇO_2024.pdf")]
    pub file_name: String,
    /// Single-receipt download for this entry.
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReceiptManifest {
    pub period: PeriodView,
    pub receipts: Vec<ReceiptEntry>,
}

pub fn short_name(full: &str) -> String {
    full.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

fn row(employee: Employee) -> PayrollRow {
    let payroll = employee.payrolls.and_then(|p| p.into_iter().next());
    let status = match &payroll {
        Some(p) if p.is_paid() => PayrollStatus::Paid,
        Some(_) => PayrollStatus::Pending,
        None => PayrollStatus::Missing,
    };
    PayrollRow {
        short_name: short_name(&employee.name),
        employee_document_id: employee.document_id,
        name: employee.name,
        responsibility: employee.responsibility,
        total_display: payroll.as_ref().and_then(|p| p.total_payable).map(format_brl),
        payroll,
        status,
    }
}

/// One group per branch, in order of first appearance.
pub fn group_by_filial(employees: Vec<Employee>) -> Vec<PayrollGroup> {
    let mut groups: Vec<PayrollGroup> = Vec::new();
    for employee in employees {
        let filial_id = employee.filial.as_ref().map(|f| f.id);
        let filial_name = employee
            .filial_name()
            .unwrap_or(UNLABELED)
            .to_string();
        let row = row(employee);
        match groups.iter_mut().find(|g| g.filial_id == filial_id) {
            Some(group) => group.rows.push(row),
            None => groups.push(PayrollGroup {
                filial_id,
                filial_name,
                rows: vec![row],
            }),
        }
    }
    groups
}

async fn employees_in(
    state: &AppState,
    session: &Session,
    period: Period,
) -> Result<Vec<Employee>, AppError> {
    state
        .backend
        .session(Some(&session.token))
        .list_employees_with_payrolls(period)
        .await
        .map_err(AppError::backend("Erro ao carregar folhas de pagamento"))
}

async fn table(
    state: &AppState,
    session: &Session,
    period: Period,
) -> Result<PayrollTable, AppError> {
    let employees = employees_in(state, session, period).await?;
    Ok(PayrollTable {
        period: period.into(),
        groups: group_by_filial(employees),
    })
}

async fn reload_payroll(
    state: &AppState,
    session: &Session,
    document_id: &str,
) -> Result<Payroll, AppError> {
    state
        .backend
        .session(Some(&session.token))
        .get_payroll(document_id)
        .await
        .map_err(|e| match e {
            ApiError::Server { status: 404, .. } => {
                AppError::NotFound("Folha de pagamento não encontrada".into())
            }
            other => AppError::backend("Erro ao carregar folha de pagamento")(other),
        })
}

fn not_found_employee() -> AppError {
    AppError::NotFound("Funcionário não encontrado".into())
}

/// Payroll table
#[utoipa::path(
    get,
    path = "/api/payrolls",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Employees of the period grouped by branch", body = PayrollTable),
        (status = 400, description = "Invalid month")
    ),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn list_payrolls(
    session: Session,
    state: web::Data<AppState>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let period = query.resolve()?;
    let table = table(&state, &session, period).await?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(table)))
}

/// Generate one payroll
///
/// Refused when the employee already has a payroll for the month.
/// Answers with the employee row reloaded for the period.
#[utoipa::path(
    post,
    path = "/api/payrolls",
    request_body = CreatePayrollForm,
    responses(
        (status = 200, description = "Payroll created", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Employee already has a payroll this month"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn create_payroll(
    session: Session,
    state: web::Data<AppState>,
    form: web::Json<CreatePayrollForm>,
) -> Result<HttpResponse, AppError> {
    let (period, payload) = form.into_inner().validate()?;
    let _guard = state
        .inflight
        .begin(format!(
            "payroll:create:{}:{}-{:02}",
            payload.employe,
            period.year,
            period.month.number()
        ))
        .ok_or_else(busy)?;

    let employee = employees_in(&state, &session, period)
        .await?
        .into_iter()
        .find(|e| e.document_id == payload.employe)
        .ok_or_else(not_found_employee)?;
    if employee.has_payroll() {
        warn!(employee = %payload.employe, period = %period, "Payroll already exists");
        return Err(AppError::Conflict("Funcionário já possui folha neste mês".into()));
    }

    state
        .backend
        .session(Some(&session.token))
        .create_payroll(&payload)
        .await
        .map_err(AppError::backend("Falha ao criar a folha de pagamento"))?;
    info!(employee = %payload.employe, period = %period, "Payroll created");

    let employee = employees_in(&state, &session, period)
        .await?
        .into_iter()
        .find(|e| e.document_id == payload.employe)
        .ok_or_else(not_found_employee)?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(employee)))
}

/// Clone last month
///
/// Copies the previous month's payrolls into the current month. The
/// backend skips employees that already have one. Answers with the
/// current month's table.
#[utoipa::path(
    post,
    path = "/api/payrolls/clone-previous",
    responses(
        (status = 200, description = "Current month after cloning", body = PayrollTable),
        (status = 502, description = "Cloning failed; nothing to assume about partial results")
    ),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn clone_previous(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let _guard = state.inflight.begin("payroll:clone-previous").ok_or_else(busy)?;

    let summary = state
        .backend
        .session(Some(&session.token))
        .clone_previous_month()
        .await
        .map_err(AppError::backend("Falha ao criar todas as folhas de pagamento"))?;
    info!(summary = %summary, "Previous month cloned");

    let table = table(&state, &session, Period::current()).await?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(table)))
}

/// Edit payroll
#[utoipa::path(
    put,
    path = "/api/payrolls/{document_id}",
    params(("document_id" = String, Path, description = "Payroll document id")),
    request_body = EditPayrollForm,
    responses(
        (status = 200, description = "Reloaded payroll", body = Payroll),
        (status = 422, description = "Validation failed")
    ),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn update_payroll(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Json<EditPayrollForm>,
) -> Result<HttpResponse, AppError> {
    let document_id = path.into_inner();
    let payload = form.into_inner().validate()?;
    let _guard = state
        .inflight
        .begin(format!("payroll:edit:{document_id}"))
        .ok_or_else(busy)?;

    state
        .backend
        .session(Some(&session.token))
        .update_payroll(&document_id, &payload)
        .await
        .map_err(AppError::backend("Falha ao atualizar a folha de pagamento"))?;
    info!(document_id = %document_id, "Payroll updated");

    let payroll = reload_payroll(&state, &session, &document_id).await?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(payroll)))
}

/// An empty body means "paid today". Anything else must be a valid form.
fn mark_paid_form(body: &[u8]) -> Result<MarkAsPaidForm, AppError> {
    if body.trim_ascii().is_empty() {
        return Ok(MarkAsPaidForm::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Rejected mark-as-paid body");
        AppError::BadRequest("Corpo da requisição inválido".into())
    })
}

/// Mark as paid
///
/// One-way: a payroll that already has `paidAt` is refused.
#[utoipa::path(
    post,
    path = "/api/payrolls/{document_id}/paid",
    params(("document_id" = String, Path, description = "Payroll document id")),
    request_body(content = MarkAsPaidForm, description = "Empty body stamps today"),
    responses(
        (status = 200, description = "Reloaded payroll", body = Payroll),
        (status = 400, description = "Body is not a valid form"),
        (status = 404, description = "Payroll not found"),
        (status = 409, description = "Already paid")
    ),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn mark_paid(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let document_id = path.into_inner();
    let payload = mark_paid_form(&body)?.validate()?;
    let _guard = state
        .inflight
        .begin(format!("payroll:mark-paid:{document_id}"))
        .ok_or_else(busy)?;

    let current = reload_payroll(&state, &session, &document_id).await?;
    if current.is_paid() {
        return Err(AppError::Conflict("Folha já está paga".into()));
    }

    state
        .backend
        .session(Some(&session.token))
        .mark_payroll_paid(&document_id, &payload)
        .await
        .map_err(AppError::backend("Falha ao marcar pagamento como realizado"))?;
    info!(document_id = %document_id, paid_at = %payload.paid_at, "Payroll marked as paid");

    let payroll = reload_payroll(&state, &session, &document_id).await?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(payroll)))
}

fn attachment(file_name: &str) -> ContentDisposition {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![
            DispositionParam::Filename(ascii),
            DispositionParam::FilenameExt(ExtendedValue {
                charset: Charset::Ext("UTF-8".to_string()),
                language_tag: None,
                value: file_name.as_bytes().to_vec(),
            }),
        ],
    }
}

/// Builds the PDF on the blocking pool.
async fn render(
    employee: &Employee,
    payroll: &Payroll,
    period: Period,
    logo: Option<Vec<u8>>,
) -> Result<Receipt, AppError> {
    let (emp, pay) = (employee.clone(), payroll.clone());
    let built = web::block(move || {
        receipt::build(&emp, &pay, period, Local::now().time(), logo.as_deref())
            .map_err(|e| e.to_string())
    })
    .await;

    let receipt = match built {
        Ok(Ok(receipt)) => receipt,
        Ok(Err(e)) => {
            error!(error = %e, employee = %employee.document_id, "Receipt generation failed");
            return Err(AppError::Receipt(format!("Erro ao gerar recibo de {}", employee.name)));
        }
        Err(e) => {
            error!(error = %e, employee = %employee.document_id, "Receipt task did not finish");
            return Err(AppError::Receipt(format!("Erro ao gerar recibo de {}", employee.name)));
        }
    };
    info!(file = %receipt.file_name, bytes = receipt.pdf.len(), "Receipt generated");
    Ok(receipt)
}

/// Download receipt
#[utoipa::path(
    get,
    path = "/api/payrolls/receipt",
    params(ReceiptQuery),
    responses(
        (status = 200, description = "PDF receipt", content_type = "application/pdf"),
        (status = 404, description = "Employee or payroll not found")
    ),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn download_receipt(
    session: Session,
    state: web::Data<AppState>,
    query: web::Query<ReceiptQuery>,
) -> Result<HttpResponse, AppError> {
    let period = PeriodQuery {
        month: query.month,
        year: query.year,
    }
    .resolve()?;

    let employee = employees_in(&state, &session, period)
        .await?
        .into_iter()
        .find(|e| e.document_id == query.employee_id)
        .ok_or_else(not_found_employee)?;
    let payroll = employee
        .first_payroll()
        .ok_or_else(|| AppError::NotFound("Funcionário sem folha neste mês".into()))?;

    let logo = receipt::load_logo(Path::new(&state.config.receipt_logo_path));
    let receipt = render(&employee, payroll, period, logo).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(attachment(receipt.file_name.as_str()))
        .body(receipt.pdf))
}

/// Branch receipts
///
/// Lists the receipt of every employee of one branch that has a payroll in
/// the period. Nothing is rendered here: each entry's `url` is the
/// single-receipt download, which builds the PDF when it is fetched.
#[utoipa::path(
    get,
    path = "/api/payrolls/receipts",
    params(BranchReceiptsQuery),
    responses((status = 200, description = "Receipts available for the branch", body = ReceiptManifest)),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn branch_receipts(
    session: Session,
    state: web::Data<AppState>,
    query: web::Query<BranchReceiptsQuery>,
) -> Result<HttpResponse, AppError> {
    let period = PeriodQuery {
        month: query.month,
        year: query.year,
    }
    .resolve()?;

    let receipts: Vec<ReceiptEntry> = employees_in(&state, &session, period)
        .await?
        .into_iter()
        .filter(|e| e.has_payroll())
        .filter(|e| {
            e.filial.as_ref().is_some_and(|f| {
                f.document_id.as_deref() == Some(query.filial_id.as_str())
                    || f.id.to_string() == query.filial_id
            })
        })
        .map(|e| ReceiptEntry {
            file_name: ReceiptFileName::new(&e.name, period).to_string(),
            url: format!(
                "{}/payrolls/receipt?employee_id={}&month={}&year={}",
                state.config.api_prefix,
                e.document_id,
                period.month.number(),
                period.year
            ),
            employee_document_id: e.document_id,
            employee_name: e.name,
        })
        .collect();
    info!(filial = %query.filial_id, count = receipts.len(), "Branch receipts listed");

    Ok(HttpResponse::Ok().json(ApiResult::ok(ReceiptManifest {
        period: period.into(),
        receipts,
    })))
}
