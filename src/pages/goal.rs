use super::{FormStatus, SubmitOutcome, filled};
use crate::egg::EggVariant;
use crate::models::{EnergyLevel, Mood};
use crate::navigation::{NavigationPayload, Navigator, Route};
use crate::services::{GoalRequest, parse_minutes};
use crate::state::AppContext;

const NO_USER: &str = "No user_id found. Please login again.";
const GOAL_PET_NAME: &str = "Blopa";

/// "New micro-goal" screen: asks the backend for tasks and opens the
/// dashboard with them.
#[derive(Debug, Clone)]
pub struct GoalPage {
    pub goal: String,
    pub energy: EnergyLevel,
    pub mood: Mood,
    minutes: String,
    status: FormStatus,
}

impl Default for GoalPage {
    fn default() -> Self {
        Self {
            goal: String::new(),
            energy: EnergyLevel::default(),
            mood: Mood::default(),
            minutes: "10".to_owned(),
            status: FormStatus::default(),
        }
    }
}

impl GoalPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Keeps only the digits, as the minutes field does while typing.
    pub fn set_minutes(&mut self, input: &str) {
        self.minutes = input.chars().filter(char::is_ascii_digit).collect();
    }

    pub fn minutes_input(&self) -> &str {
        &self.minutes
    }

    pub fn minutes(&self) -> u32 {
        parse_minutes(&self.minutes)
    }

    pub fn can_submit(&self) -> bool {
        filled(&self.goal) && !self.status.is_loading()
    }

    pub async fn submit(&mut self, ctx: &AppContext, nav: &mut impl Navigator) -> SubmitOutcome {
        if self.status.is_loading() {
            return SubmitOutcome::Blocked;
        }
        if !filled(&self.goal) {
            return self.status.reject("Tell us what you want to work on.");
        }

        self.status.start();
        let Some(user_id) = ctx.session.load_identifier().await else {
            return self.status.fail(NO_USER);
        };

        let request = GoalRequest {
            user_id,
            context: self.goal.trim().to_owned(),
            minutes: self.minutes(),
            mood: self.mood,
            energy: self.energy,
        };
        let tasks = match ctx.client.tasks().generate(&request).await {
            Ok(tasks) => tasks,
            Err(err) => return self.status.fail(format!("Failed to get micro-goal: {err}")),
        };

        self.status.finish();
        nav.navigate(Route::Dashboard(NavigationPayload {
            egg: Some(EggVariant::Two),
            name: Some(GOAL_PET_NAME.to_owned()),
            tasks: Some(tasks),
            user_id: None,
        }));
        SubmitOutcome::Completed
    }
}
