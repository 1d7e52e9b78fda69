use super::{FormStatus, SubmitOutcome, filled};
use crate::navigation::{Navigator, Route};
use crate::services::Credentials;
use crate::state::AppContext;
use tracing::warn;

const LOGIN_FAILED: &str = "Login failed. Please try again.";

#[derive(Debug, Clone, Default)]
pub struct LoginPage {
    pub email: String,
    pub password: String,
    status: FormStatus,
}

impl LoginPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn can_submit(&self) -> bool {
        filled(&self.email) && filled(&self.password) && !self.status.is_loading()
    }

    pub async fn submit(&mut self, ctx: &AppContext, nav: &mut impl Navigator) -> SubmitOutcome {
        if self.status.is_loading() {
            return SubmitOutcome::Blocked;
        }
        if !self.can_submit() {
            return self.status.reject("Please enter your email and password.");
        }

        self.status.start();
        let credentials = Credentials {
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
        };

        let record = match ctx.client.auth().login(&credentials).await {
            Ok(record) => record,
            Err(err) => return self.status.fail(err.user_message(LOGIN_FAILED)),
        };
        if let Err(err) = ctx.session.save(&record).await {
            warn!("could not persist session: {err}");
            return self.status.fail(format!("Could not save your session: {err}"));
        }

        self.status.finish();
        nav.navigate(Route::dashboard());
        SubmitOutcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_both_fields() {
        let mut page = LoginPage::new();
        assert!(!page.can_submit());
        page.email = "ana@example.com".to_owned();
        page.password = "   ".to_owned();
        assert!(!page.can_submit());
        page.password = "secret".to_owned();
        assert!(page.can_submit());
    }
}
