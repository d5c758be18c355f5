use crate::api::{HttpApi, NutritionApi};
use crate::config::ClientConfig;
use crate::users::{SelectionStore, UserSession};
use std::sync::Arc;

/// Shared handles every view is built from.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClientConfig>,
    pub api: Arc<dyn NutritionApi>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(ClientConfig::from_env()?);
        let api = Arc::new(HttpApi::from_config(&config)?) as Arc<dyn NutritionApi>;
        Ok(Self { config, api })
    }

    pub fn from_parts(config: Arc<ClientConfig>, api: Arc<dyn NutritionApi>) -> Self {
        Self { config, api }
    }

    pub fn user_session(&self) -> UserSession {
        UserSession::new(
            self.api.clone(),
            SelectionStore::new(&self.config.user_state_path),
        )
    }
}
