use crate::backend::BackendClient;
use crate::config::Config;
use crate::utils::inflight::InFlight;

/// Shared by every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub backend: BackendClient,
    pub inflight: InFlight,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let backend = BackendClient::new(config.backend_url.clone());
        Self {
            config,
            backend,
            inflight: InFlight::new(),
        }
    }
}
