use crate::{
    api::{dashboard, employee, filial, payroll},
    auth::handlers,
    config::Config,
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_min = requests_per_min.max(1);
    let per_ms = (60_000 / per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        // period and burst are both non-zero above
        .unwrap_or_default();
    Governor::new(&cfg)
}

/// Malformed JSON bodies answer with the usual `{success:false, error}`.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected request body");
        AppError::BadRequest("Corpo da requisição inválido".into()).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    cfg.app_data(json_config());

    // Session
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Dashboard page; the session guard redirects to `/` without a token
    cfg.service(
        web::resource("/dashboard")
            .wrap(protected_limiter.clone())
            .route(web::get().to(dashboard::dashboard)),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter) // rate limiting
            .service(
                web::resource("/me")
                    .route(web::get().to(handlers::me))
                    .route(web::put().to(handlers::update_me)),
            )
            .service(web::resource("/dashboard").route(web::get().to(dashboard::dashboard)))
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee)),
                    )
                    // /employees/{document_id}
                    .service(
                        web::resource("/{document_id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/filiais")
                    .service(
                        web::resource("")
                            .route(web::get().to(filial::list_filiais))
                            .route(web::post().to(filial::create_filial)),
                    )
                    .service(
                        web::resource("/{document_id}")
                            .route(web::put().to(filial::update_filial))
                            .route(web::delete().to(filial::delete_filial)),
                    ),
            )
            .service(
                web::scope("/payrolls")
                    // /payrolls
                    .service(
                        web::resource("")
                            .route(web::get().to(payroll::list_payrolls))
                            .route(web::post().to(payroll::create_payroll)),
                    )
                    // fixed segments before /{document_id}
                    .service(
                        web::resource("/clone-previous")
                            .route(web::post().to(payroll::clone_previous)),
                    )
                    .service(
                        web::resource("/receipt").route(web::get().to(payroll::download_receipt)),
                    )
                    .service(
                        web::resource("/receipts").route(web::get().to(payroll::branch_receipts)),
                    )
                    // /payrolls/{document_id}
                    .service(
                        web::resource("/{document_id}")
                            .route(web::put().to(payroll::update_payroll)),
                    )
                    // /payrolls/{document_id}/paid
                    .service(
                        web::resource("/{document_id}/paid")
                            .route(web::post().to(payroll::mark_paid)),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{bearer, state};
    use crate::auth::middleware::session_middleware;
    use actix_web::{App, http::StatusCode, middleware::from_fn};
    use actix_web::test as actix_test;

    #[test]
    fn zero_rate_still_builds_a_limiter() {
        let _ = build_limiter(0);
        let _ = build_limiter(1);
        let _ = build_limiter(120_000);
    }

    #[actix_web::test]
    async fn malformed_body_is_a_bad_request() {
        let data = state("http://127.0.0.1:9");
        let config = data.config.clone();
        let app = actix_test::init_service(
            App::new()
                .app_data(data)
                .wrap(from_fn(session_middleware))
                .configure(|cfg| configure(cfg, config)),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/filiais")
            .peer_addr("127.0.0.1:4000".parse().unwrap())
            .insert_header(bearer())
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn protected_scope_requires_a_session() {
        let data = state("http://127.0.0.1:9");
        let config = data.config.clone();
        let app = actix_test::init_service(
            App::new()
                .app_data(data)
                .wrap(from_fn(session_middleware))
                .configure(|cfg| configure(cfg, config)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/api/payrolls/receipt?employee_id=e1")
            .peer_addr("127.0.0.1:4000".parse().unwrap())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = actix_test::TestRequest::get()
            .uri("/dashboard")
            .peer_addr("127.0.0.1:4000".parse().unwrap())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get("location").unwrap(), "/");
    }
}
