use actix_web::{HttpResponse, web};
use tracing::info;

use super::busy;
use crate::auth::session::Session;
use crate::error::AppError;
use crate::forms::Validate;
use crate::forms::filial::FilialForm;
use crate::model::filial::Filial;
use crate::models::ApiResult;
use crate::state::AppState;

async fn reload(state: &AppState, session: &Session) -> Result<Vec<Filial>, AppError> {
    state
        .backend
        .session(Some(&session.token))
        .list_filiais()
        .await
        .map_err(AppError::backend("Erro ao carregar filiais"))
}

#[utoipa::path(
    get,
    path = "/api/filiais",
    responses((status = 200, description = "Branches with their employees", body = [Filial])),
    tag = "Filial",
    security(("bearer_auth" = []))
)]
pub async fn list_filiais(session: Session, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let filiais = reload(&state, &session).await?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(filiais)))
}

#[utoipa::path(
    post,
    path = "/api/filiais",
    request_body = FilialForm,
    responses(
        (status = 200, description = "Branch created; reloaded list", body = [Filial]),
        (status = 422, description = "Name missing")
    ),
    tag = "Filial",
    security(("bearer_auth" = []))
)]
pub async fn create_filial(
    session: Session,
    state: web::Data<AppState>,
    form: web::Json<FilialForm>,
) -> Result<HttpResponse, AppError> {
    let payload = form.into_inner().validate()?;
    let _guard = state
        .inflight
        .begin(format!("filial:create:{}", payload.name))
        .ok_or_else(busy)?;

    state
        .backend
        .session(Some(&session.token))
        .create_filial(&payload)
        .await
        .map_err(AppError::backend("Erro ao criar filial"))?;
    info!(name = %payload.name, "Filial created");

    let filiais = reload(&state, &session).await?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(filiais)))
}

#[utoipa::path(
    put,
    path = "/api/filiais/{document_id}",
    params(("document_id" = String, Path, description = "Branch document id")),
    request_body = FilialForm,
    responses(
        (status = 200, description = "Branch renamed; reloaded list", body = [Filial]),
        (status = 422, description = "Name missing")
    ),
    tag = "Filial",
    security(("bearer_auth" = []))
)]
pub async fn update_filial(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Json<FilialForm>,
) -> Result<HttpResponse, AppError> {
    let document_id = path.into_inner();
    let payload = form.into_inner().validate()?;
    let _guard = state
        .inflight
        .begin(format!("filial:update:{document_id}"))
        .ok_or_else(busy)?;

    state
        .backend
        .session(Some(&session.token))
        .update_filial(&document_id, &payload)
        .await
        .map_err(AppError::backend("Erro ao atualizar filial"))?;
    info!(document_id = %document_id, "Filial updated");

    let filiais = reload(&state, &session).await?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(filiais)))
}

#[utoipa::path(
    delete,
    path = "/api/filiais/{document_id}",
    params(("document_id" = String, Path, description = "Branch document id")),
    responses((status = 200, description = "Branch deleted; reloaded list", body = [Filial])),
    tag = "Filial",
    security(("bearer_auth" = []))
)]
pub async fn delete_filial(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let document_id = path.into_inner();
    let _guard = state
        .inflight
        .begin(format!("filial:delete:{document_id}"))
        .ok_or_else(busy)?;

    state
        .backend
        .session(Some(&session.token))
        .delete_filial(&document_id)
        .await
        .map_err(AppError::backend("Erro ao excluir filial"))?;
    info!(document_id = %document_id, "Filial deleted");

    let filiais = reload(&state, &session).await?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(filiais)))
}
