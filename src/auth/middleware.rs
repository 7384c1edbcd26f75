use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::LOCATION,
    web::Data,
};
use serde_json::json;

use crate::auth::session::{Session, token_from_request};
use crate::state::AppState;

const PUBLIC_PAGES: [&str; 4] = ["/", "/register", "/forgot-password", "/reset-password"];
/// Public pages a signed-in user is sent away from.
const SIGNED_OUT_ONLY: [&str; 2] = ["/", "/register"];
const HOME: &str = "/dashboard";
const LOGIN_PAGE: &str = "/";

#[derive(Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Continue,
    Redirect(&'static str),
    Unauthorized,
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Where a request for `path` goes, given whether it carries a live session.
pub fn decide(path: &str, api_prefix: &str, signed_in: bool) -> GuardDecision {
    if PUBLIC_PAGES.contains(&path) {
        if signed_in && SIGNED_OUT_ONLY.contains(&path) {
            return GuardDecision::Redirect(HOME);
        }
        return GuardDecision::Continue;
    }
    if under(path, HOME) && !signed_in {
        return GuardDecision::Redirect(LOGIN_PAGE);
    }
    if under(path, api_prefix) && !signed_in {
        return GuardDecision::Unauthorized;
    }
    GuardDecision::Continue
}

/// Attaches the [`Session`] to the request and applies the page guard.
pub async fn session_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let state = req
        .app_data::<Data<AppState>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App state missing"))?;
    let api_prefix = state.config.api_prefix.clone();

    let now = chrono::Utc::now().timestamp();
    let session = token_from_request(req.request()).and_then(|t| Session::from_token(&t, now));
    let signed_in = session.is_some();

    match decide(req.path(), &api_prefix, signed_in) {
        GuardDecision::Continue => {}
        GuardDecision::Redirect(to) => {
            tracing::debug!(path = %req.path(), to, "Guard redirect");
            let resp = HttpResponse::Found().insert_header((LOCATION, to)).finish();
            return Ok(req.into_response(resp));
        }
        GuardDecision::Unauthorized => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"success": false, "error": "Sessão expirada ou ausente"}));
            return Ok(req.into_response(resp));
        }
    }

    if let Some(session) = session {
        req.extensions_mut().insert(session);
    }
    next.call(req).await
}
