use crate::client::ApiClient;
use crate::errors::ApiError;
use crate::models::HealthStatus;

pub struct HealthService<'a> {
    client: &'a ApiClient,
}

impl<'a> HealthService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn check(&self) -> Result<HealthStatus, ApiError> {
        self.client.get_json("api/health").await
    }
}
