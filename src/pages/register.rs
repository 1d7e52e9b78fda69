use super::{FormStatus, SubmitOutcome, filled};
use crate::egg::{EggSource, RandomEggs};
use crate::navigation::{Navigator, Route};
use crate::services::Registration;
use crate::state::AppContext;
use tracing::warn;

const REGISTER_FAILED: &str = "Register failed. Please try again.";

pub struct RegisterPage {
    pub email: String,
    pub name: String,
    pub password: String,
    pub confirm_password: String,
    eggs: Box<dyn EggSource>,
    status: FormStatus,
}

impl Default for RegisterPage {
    fn default() -> Self {
        Self::with_eggs(RandomEggs)
    }
}

impl RegisterPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The egg variant is drawn from `eggs` when the form is submitted.
    pub fn with_eggs(eggs: impl EggSource + 'static) -> Self {
        Self {
            email: String::new(),
            name: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            eggs: Box::new(eggs),
            status: FormStatus::default(),
        }
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn passwords_match(&self) -> bool {
        filled(&self.password)
            && filled(&self.confirm_password)
            && self.password == self.confirm_password
    }

    pub fn can_submit(&self) -> bool {
        filled(&self.email)
            && filled(&self.name)
            && filled(&self.password)
            && self.passwords_match()
            && !self.status.is_loading()
    }

    fn validation_error(&self) -> Option<&'static str> {
        let fields = [&self.email, &self.name, &self.password, &self.confirm_password];
        if !fields.iter().all(|field| filled(field)) {
            return Some("Please fill in every field.");
        }
        if self.password != self.confirm_password {
            return Some("Passwords do not match.");
        }
        None
    }

    pub async fn submit(&mut self, ctx: &AppContext, nav: &mut impl Navigator) -> SubmitOutcome {
        if self.status.is_loading() {
            return SubmitOutcome::Blocked;
        }
        if let Some(message) = self.validation_error() {
            return self.status.reject(message);
        }

        self.status.start();
        let registration = Registration {
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
            name: self.name.trim().to_owned(),
            egg: self.eggs.pick(),
        };

        let record = match ctx.client.auth().register(&registration).await {
            Ok(record) => record,
            Err(err) => return self.status.fail(err.user_message(REGISTER_FAILED)),
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
