use crate::client::ApiClient;
use crate::errors::ApiError;
use crate::models::{EnergyLevel, GenerateTasksPayload, GenerateTasksResponse, Mood};
use tracing::info;

pub const DEFAULT_MINUTES: u32 = 10;

#[derive(Debug, Clone)]
pub struct GoalRequest {
    pub user_id: String,
    pub context: String,
    pub minutes: u32,
    pub mood: Mood,
    pub energy: EnergyLevel,
}

impl GoalRequest {
    pub fn payload(&self) -> GenerateTasksPayload<'_> {
        GenerateTasksPayload {
            user_id: &self.user_id,
            context: self.context.trim(),
            time: self.minutes.max(1),
            mood: self.mood.wire_token(),
            energy_level: self.energy.wire_token(),
        }
    }
}

pub struct TasksService<'a> {
    client: &'a ApiClient,
}

impl<'a> TasksService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn generate(&self, request: &GoalRequest) -> Result<Vec<String>, ApiError> {
        let response: GenerateTasksResponse = self
            .client
            .post_json("tasks/generate", &request.payload())
            .await?;
        info!(count = response.tasks.len(), "micro-tasks generated");
        Ok(response.tasks)
    }
}

/// Minutes typed by the user. Non-digits are dropped; nothing left means the
/// default; values are at least 1 and saturate instead of overflowing.
pub fn parse_minutes(input: &str) -> u32 {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return DEFAULT_MINUTES;
    }
    digits.parse::<u32>().unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minutes_follow_input_rules() {
        assert_eq!(parse_minutes("0"), 1);
        assert_eq!(parse_minutes(""), 10);
        assert_eq!(parse_minutes("7"), 7);
        assert_eq!(parse_minutes("abc"), 10);
        assert_eq!(parse_minutes(" 2 5 min"), 25);
        assert_eq!(parse_minutes("99999999999999"), u32::MAX);
    }

    #[test]
    fn payload_uses_wire_tokens() {
        let request = GoalRequest {
            user_id: "u-1".to_owned(),
            context: "  study calculus ".to_owned(),
            minutes: parse_minutes("10"),
            mood: Mood::from_label("Stressed :("),
            energy: EnergyLevel::Low,
        };
        assert_eq!(
            serde_json::to_value(request.payload()).unwrap(),
            json!({
                "user_id": "u-1",
                "context": "study calculus",
                "time": 10,
                "mood": "stressed",
                "energy_level": "low",
            })
        );
    }
}
