//! One module per backend capability. Each service borrows the shared
//! [`ApiClient`] and keeps no state between calls.

pub mod auth;
pub mod health;
pub mod tasks;
pub mod verify;

use crate::client::ApiClient;

pub use auth::{AuthService, Credentials, Registration};
pub use health::HealthService;
pub use tasks::{GoalRequest, TasksService, parse_minutes};
pub use verify::{ImageField, ImagePayload, ProofSubmission, VerifyService};

impl ApiClient {
    pub fn health(&self) -> HealthService<'_> {
        HealthService::new(self)
    }

    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    pub fn tasks(&self) -> TasksService<'_> {
        TasksService::new(self)
    }

    pub fn verify(&self) -> VerifyService<'_> {
        VerifyService::new(self)
    }
}
