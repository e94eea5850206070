use crate::config::ConsoleConfig;
use crate::controller::DashboardController;
use crate::fetch::DashboardClient;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardController<DashboardClient>,
}

impl AppState {
    pub fn new(config: &ConsoleConfig) -> Self {
        let client = DashboardClient::new(config.upstream_url.clone(), config.request_timeout);
        Self {
            dashboard: DashboardController::new(client, config.request),
        }
    }
}
