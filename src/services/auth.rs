use crate::client::ApiClient;
use crate::egg::EggVariant;
use crate::errors::ApiError;
use crate::models::{LoginPayload, RegisterPayload, SessionRecord};
use tracing::info;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub egg: EggVariant,
}

pub struct AuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// The backend names the password field `mdp`.
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionRecord, ApiError> {
        let payload = LoginPayload {
            email: &credentials.email,
            mdp: &credentials.password,
        };
        let record = self.client.post_json("users/login", &payload).await?;
        info!(email = %credentials.email, "logged in");
        Ok(record)
    }

    pub async fn register(&self, registration: &Registration) -> Result<SessionRecord, ApiError> {
        let filepath = registration.egg.file_token();
        let payload = RegisterPayload {
            email: &registration.email,
            mdp: &registration.password,
            name: &registration.name,
            filepath: &filepath,
        };
        let record = self.client.post_json("users/register", &payload).await?;
        info!(email = %registration.email, egg = %filepath, "registered");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_payload_renames_password() {
        let payload = LoginPayload {
            email: "ana@example.com",
            mdp: "hunter2",
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"email": "ana@example.com", "mdp": "hunter2"})
        );
    }
}
