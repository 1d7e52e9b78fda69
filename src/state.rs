use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::errors::ApiError;
use crate::storage::SessionStore;

/// What every page controller needs: the gateway and the current session.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub client: ApiClient,
    pub session: SessionStore,
}

impl AppContext {
    pub fn new(client: ApiClient, session: SessionStore) -> Self {
        Self { client, session }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(
            ApiClient::new(config)?,
            SessionStore::at(config.session_path.clone()),
        ))
    }
}
