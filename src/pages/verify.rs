use super::{FormStatus, SubmitOutcome, filled};
use crate::navigation::{DEFAULT_PET_NAME, Navigator, Route};
use crate::services::{ImageField, ImagePayload, ProofSubmission};
use crate::state::AppContext;

const NO_USER: &str = "No user_id found. Please login again.";
const NOT_VERIFIED: &str = "Task not verified. Try another photo.";

/// Stand-alone proof page: one task, one photo, and a success panel that
/// leads back to the dashboard.
#[derive(Debug, Clone)]
pub struct VerifyPage {
    pub task: String,
    pub pet_name: String,
    image: Option<ImagePayload>,
    show_success: bool,
    status: FormStatus,
}

impl Default for VerifyPage {
    fn default() -> Self {
        Self::new("")
    }
}

impl VerifyPage {
    pub fn new(initial_task: &str) -> Self {
        Self {
            task: initial_task.to_owned(),
            pet_name: DEFAULT_PET_NAME.to_owned(),
            image: None,
            show_success: false,
            status: FormStatus::default(),
        }
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    pub fn showing_success(&self) -> bool {
        self.show_success
    }

    pub fn pick_file(&mut self, image: ImagePayload) {
        self.image = Some(image);
        self.status.clear_error();
    }

    pub fn can_submit(&self) -> bool {
        filled(&self.task) && self.image.is_some() && !self.status.is_loading()
    }

    pub async fn submit(&mut self, ctx: &AppContext) -> SubmitOutcome {
        if self.status.is_loading() {
            return SubmitOutcome::Blocked;
        }
        if !filled(&self.task) {
            return self.status.reject("Describe the task you completed.");
        }
        let Some(image) = self.image.as_ref() else {
            return self.status.reject("Please upload a photo first.");
        };

        self.status.start();
        let Some(user_id) = ctx.session.load_identifier().await else {
            return self.status.fail(NO_USER);
        };

        let submission = ProofSubmission {
            user_id: &user_id,
            task: self.task.trim(),
            image,
        };
        let outcome = match ctx.client.verify().submit(submission, ImageField::File).await {
            Ok(outcome) => outcome,
            Err(err) => return self.status.fail(format!("Failed to verify task: {err}")),
        };

        if !outcome.verified {
            let message = outcome.message.unwrap_or_else(|| NOT_VERIFIED.to_owned());
            return self.status.fail(message);
        }

        self.status.finish();
        self.show_success = true;
        SubmitOutcome::Completed
    }

    /// Closes the success panel and stays on the page.
    pub fn dismiss_success(&mut self) {
        self.show_success = false;
    }

    pub fn continue_to_dashboard(&mut self, nav: &mut impl Navigator) {
        self.show_success = false;
        nav.navigate(Route::dashboard());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_task_and_photo() {
        let mut page = VerifyPage::new("  ");
        page.pick_file(ImagePayload::new("desk.jpg", vec![7]));
        assert!(!page.can_submit());
        page.task = "clear the desk".to_owned();
        assert!(page.can_submit());
    }

    #[test]
    fn continuing_navigates_to_dashboard() {
        let mut page = VerifyPage::default();
        page.show_success = true;
        let mut history = Vec::new();
        page.continue_to_dashboard(&mut history);
        assert!(!page.showing_success());
        assert_eq!(history, vec![Route::dashboard()]);
    }
}
