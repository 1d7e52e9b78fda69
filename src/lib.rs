pub mod client;
pub mod config;
pub mod egg;
pub mod errors;
pub mod models;
pub mod navigation;
pub mod pages;
pub mod services;
pub mod state;
pub mod storage;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use errors::{ApiError, StoreError};
pub use navigation::{NavigationPayload, Navigator, Route};
pub use state::AppContext;
pub use storage::{SessionStore, extract_user_id};
