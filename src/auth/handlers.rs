use actix_web::cookie::{Cookie, SameSite, time::OffsetDateTime};
use actix_web::{HttpResponse, web};
use tracing::{debug, info, instrument, warn};

use crate::auth::session::{Session, TOKEN_COOKIE};
use crate::backend::ApiError;
use crate::error::AppError;
use crate::forms::Validate;
use crate::forms::user::UpdateUserForm;
use crate::models::{ApiResult, LoginReqDto};
use crate::state::AppState;

fn session_cookie(token: String, exp: Option<i64>, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .finish();
    if let Some(at) = exp.and_then(|e| OffsetDateTime::from_unix_timestamp(e).ok()) {
        cookie.set_expires(at);
    }
    cookie
}

fn cleared_cookie() -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, "")
        .path("/")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .finish()
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Signed in; sets the `token` cookie", body = User),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(state, body),
    fields(identifier = %body.identifier)
)]
pub async fn login(
    body: web::Json<LoginReqDto>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    let LoginReqDto { identifier, password } = body.into_inner();
    if identifier.trim().is_empty() || password.is_empty() {
        info!("Validation failed: empty identifier or password");
        return Err(AppError::BadRequest("Email e senha são obrigatórios".into()));
    }

    let login = state
        .backend
        .session(None)
        .login(identifier.trim(), &password)
        .await
        .map_err(|e| match e {
            ApiError::Auth(reason) => {
                info!(reason = %reason, "Invalid credentials");
                AppError::Unauthorized("Email ou senha inválidos".into())
            }
            other => AppError::backend("Erro ao fazer login")(other),
        })?;

    let exp = Session::decode(&login.jwt).map(|c| c.exp);
    if exp.is_none() {
        warn!(user_id = login.user.id, "Backend token has no readable expiry");
    }
    debug!(user_id = login.user.id, "Setting session cookie");

    info!("Login successful");
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(login.jwt, exp, state.config.cookie_secure))
        .json(ApiResult::ok(login.user)))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Session cookie cleared")),
    tag = "Auth"
)]
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cleared_cookie())
        .json(ApiResult::done())
}

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "No session")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
pub async fn me(session: Session, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let user = state
        .backend
        .session(Some(&session.token))
        .current_user()
        .await
        .map_err(AppError::backend("Erro ao carregar usuário"))?;
    Ok(HttpResponse::Ok().json(ApiResult::ok(user)))
}

#[utoipa::path(
    put,
    path = "/api/me",
    request_body = UpdateUserForm,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 422, description = "Validation failed")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
pub async fn update_me(
    session: Session,
    state: web::Data<AppState>,
    form: web::Json<UpdateUserForm>,
) -> Result<HttpResponse, AppError> {
    let payload = form.into_inner().validate()?;

    let user = state
        .backend
        .session(Some(&session.token))
        .update_user(session.user_id(), &payload)
        .await
        .map_err(AppError::backend("Erro ao atualizar usuário"))?;

    info!(user_id = user.id, "User profile updated");
    Ok(HttpResponse::Ok().json(ApiResult::ok(user)))
}
