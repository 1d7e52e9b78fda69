//! Per-screen controllers. Each one owns its form fields, validates them,
//! makes at most one service call per submission and then either navigates
//! or keeps an inline error.

pub mod dashboard;
pub mod goal;
pub mod login;
pub mod name_pet;
pub mod register;
pub mod verify;

pub use dashboard::{AUTO_CLOSE_DELAY, DashboardPage, ProofModal};
pub use goal::GoalPage;
pub use login::LoginPage;
pub use name_pet::NamePetPage;
pub use register::RegisterPage;
pub use verify::VerifyPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent: a field is missing or a request is already running.
    Blocked,
    /// The request ran and failed; the page keeps an error message.
    Failed,
    Completed,
}

/// `loading` and the inline error shared by the submission-driven pages.
#[derive(Debug, Clone, Default)]
pub struct FormStatus {
    loading: bool,
    error: Option<String>,
}

impl FormStatus {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish(&mut self) {
        self.loading = false;
    }

    fn fail(&mut self, message: impl Into<String>) -> SubmitOutcome {
        self.loading = false;
        self.error = Some(message.into());
        SubmitOutcome::Failed
    }

    fn reject(&mut self, message: impl Into<String>) -> SubmitOutcome {
        self.error = Some(message.into());
        SubmitOutcome::Blocked
    }

    fn clear_error(&mut self) {
        self.error = None;
    }
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}
