use super::SubmitOutcome;
use crate::egg::EggVariant;
use crate::errors::ApiError;
use crate::navigation::NavigationPayload;
use crate::services::{ImageField, ImagePayload, ProofSubmission};
use crate::state::AppContext;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

/// How long a successful proof stays on screen before the modal closes.
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_millis(700);

/// Proof upload dialog for one task of the list.
#[derive(Debug, Clone)]
pub struct ProofModal {
    task: String,
    index: usize,
    image: Option<ImagePayload>,
    message: Option<String>,
    accepted: Option<bool>,
    close_at: Option<Instant>,
}

impl ProofModal {
    fn open(task: String, index: usize) -> Self {
        Self {
            task,
            index,
            image: None,
            message: None,
            accepted: None,
            close_at: None,
        }
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// `Some(true)` after a verified proof, `Some(false)` after any failure.
    pub fn accepted(&self) -> Option<bool> {
        self.accepted
    }

    pub fn closes_at(&self) -> Option<Instant> {
        self.close_at
    }

    fn settle(&mut self, accepted: bool, message: String) {
        self.accepted = Some(accepted);
        self.message = Some(message);
    }
}

/// Companion card plus the current task list.
#[derive(Debug, Clone)]
pub struct DashboardPage {
    egg: EggVariant,
    pet_name: String,
    user_id: Option<String>,
    tasks: Vec<String>,
    modal: Option<ProofModal>,
    loading: bool,
}

impl DashboardPage {
    /// The user id comes from the navigation payload when present, otherwise
    /// from the stored session.
    pub async fn open(payload: &NavigationPayload, ctx: &AppContext) -> Self {
        let user_id = match &payload.user_id {
            Some(id) => Some(id.clone()),
            None => ctx.session.resolve_identifier().await,
        };
        Self::with_user(payload, user_id)
    }

    pub fn with_user(payload: &NavigationPayload, user_id: Option<String>) -> Self {
        Self {
            egg: payload.egg(),
            pet_name: payload.pet_name().to_owned(),
            user_id,
            tasks: payload.tasks().to_vec(),
            modal: None,
            loading: false,
        }
    }

    pub fn egg(&self) -> EggVariant {
        self.egg
    }

    pub fn pet_name(&self) -> &str {
        &self.pet_name
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    pub fn has_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn modal(&self) -> Option<&ProofModal> {
        self.modal.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Opens a fresh modal for the task at `index`; a previous selection and
    /// message are discarded.
    pub fn open_task(&mut self, index: usize) -> bool {
        let Some(task) = self.tasks.get(index) else {
            return false;
        };
        self.modal = Some(ProofModal::open(task.clone(), index));
        true
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.loading = false;
    }

    /// Replaces the selected photo. The previous payload is dropped here.
    pub fn pick_file(&mut self, image: ImagePayload) {
        if let Some(modal) = self.modal.as_mut() {
            modal.image = Some(image);
            modal.message = None;
            modal.accepted = None;
        }
    }

    /// Closes the modal once its auto-close deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        let due = self
            .modal
            .as_ref()
            .and_then(|modal| modal.close_at)
            .is_some_and(|deadline| now >= deadline);
        if due {
            self.close_modal();
        }
    }

    pub async fn submit_proof(&mut self, ctx: &AppContext) -> SubmitOutcome {
        if self.loading {
            return SubmitOutcome::Blocked;
        }
        let Some(modal) = self.modal.as_mut() else {
            return SubmitOutcome::Blocked;
        };
        let Some(user_id) = self.user_id.as_deref() else {
            modal.settle(false, "Missing user_id. Log in again.".to_owned());
            return SubmitOutcome::Blocked;
        };
        let Some(image) = modal.image.as_ref() else {
            modal.settle(false, "Please upload a photo first.".to_owned());
            return SubmitOutcome::Blocked;
        };

        let submission = ProofSubmission {
            user_id,
            task: &modal.task,
            image,
        };
        self.loading = true;
        modal.message = None;
        modal.accepted = None;
        let result = ctx.client.verify().submit(submission, ImageField::Image).await;
        self.loading = false;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                let message = match &err {
                    ApiError::Rejected { .. } => err.user_message("Validation failed."),
                    ApiError::Request(_) => err.to_string(),
                    _ => "Network error while validating.".to_owned(),
                };
                if let Some(modal) = self.modal.as_mut() {
                    modal.settle(false, message);
                }
                return SubmitOutcome::Failed;
            }
        };

        let reason = outcome.reason.as_deref().unwrap_or("No reason.");
        let confidence = outcome.display_confidence();
        let Some(modal) = self.modal.as_mut() else {
            return SubmitOutcome::Failed;
        };
        if !outcome.verified {
            modal.settle(false, format!("Not valid: {reason} (conf: {confidence:.2})"));
            return SubmitOutcome::Failed;
        }

        modal.settle(true, format!("Valid! {reason} (conf: {confidence:.2})"));
        modal.close_at = Some(Instant::now() + AUTO_CLOSE_DELAY);
        let index = modal.index;
        if index < self.tasks.len() {
            let done = self.tasks.remove(index);
            info!(task = %done, remaining = self.tasks.len(), "task completed");
        }
        SubmitOutcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(tasks: &[&str]) -> DashboardPage {
        let payload = NavigationPayload {
            tasks: Some(tasks.iter().map(|task| (*task).to_owned()).collect()),
            ..NavigationPayload::default()
        };
        DashboardPage::with_user(&payload, Some("u-1".to_owned()))
    }

    #[test]
    fn payload_defaults_fill_the_card() {
        let page = DashboardPage::with_user(&NavigationPayload::default(), None);
        assert_eq!(page.egg(), EggVariant::Two);
        assert_eq!(page.pet_name(), "Pablo");
        assert!(!page.has_tasks());
        assert_eq!(page.user_id(), None);
    }

    #[test]
    fn opening_a_task_resets_the_modal() {
        let mut page = page_with(&["stretch", "water plants"]);
        assert!(!page.open_task(5));
        assert!(page.modal().is_none());

        assert!(page.open_task(1));
        page.pick_file(ImagePayload::new("plants.jpg", vec![1, 2, 3]));
        assert!(page.modal().unwrap().image().is_some());

        assert!(page.open_task(0));
        let modal = page.modal().unwrap();
        assert_eq!(modal.task(), "stretch");
        assert_eq!(modal.index(), 0);
        assert!(modal.image().is_none());
        assert!(modal.message().is_none());
    }

    #[test]
    fn picking_a_file_replaces_the_previous_one() {
        let mut page = page_with(&["stretch"]);
        page.open_task(0);
        page.pick_file(ImagePayload::new("first.jpg", vec![1]));
        page.pick_file(ImagePayload::new("second.png", vec![2, 2]));
        let image = page.modal().unwrap().image().unwrap();
        assert_eq!(image.file_name, "second.png");
        assert_eq!(image.len(), 2);
    }

    #[tokio::test]
    async fn missing_photo_is_reported_without_a_request() {
        let mut page = page_with(&["stretch"]);
        page.open_task(0);
        let ctx = offline_context();
        assert_eq!(page.submit_proof(&ctx).await, SubmitOutcome::Blocked);
        let modal = page.modal().unwrap();
        assert_eq!(modal.message(), Some("Please upload a photo first."));
        assert_eq!(modal.accepted(), Some(false));
    }

    #[tokio::test]
    async fn missing_user_is_reported_without_a_request() {
        let payload = NavigationPayload {
            tasks: Some(vec!["stretch".to_owned()]),
            ..NavigationPayload::default()
        };
        let mut page = DashboardPage::with_user(&payload, None);
        page.open_task(0);
        page.pick_file(ImagePayload::new("me.jpg", vec![1]));
        let ctx = offline_context();
        assert_eq!(page.submit_proof(&ctx).await, SubmitOutcome::Blocked);
        assert_eq!(
            page.modal().unwrap().message(),
            Some("Missing user_id. Log in again.")
        );
    }

    #[test]
    fn tick_closes_only_after_deadline() {
        let mut page = page_with(&["stretch"]);
        page.open_task(0);
        let now = Instant::now();
        page.modal.as_mut().unwrap().close_at = Some(now + AUTO_CLOSE_DELAY);

        page.tick(now);
        assert!(page.modal().is_some());
        page.tick(now + AUTO_CLOSE_DELAY);
        assert!(page.modal().is_none());
    }

    fn offline_context() -> AppContext {
        let config = crate::config::ClientConfig::resolve(|key| {
            (key == "BLOPA_API_URL").then(|| "http://127.0.0.1:9".to_owned())
        })
        .unwrap();
        AppContext::from_config(&config).unwrap()
    }
}
