use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body returned by `/users/login` and `/users/register`, kept exactly as the
/// backend sent it. Known fields are read through accessors that skip values
/// of an unexpected type instead of rejecting the whole record.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct SessionRecord(Map<String, Value>);

impl SessionRecord {
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }

    pub fn token(&self) -> Option<&str> {
        self.0.get("token").and_then(Value::as_str)
    }

    pub fn user(&self) -> Option<AuthUser<'_>> {
        self.0.get("user").and_then(Value::as_object).map(AuthUser)
    }
}

/// Read-only view of the `user` object inside a [`SessionRecord`].
#[derive(Debug, Clone, Copy)]
pub struct AuthUser<'a>(&'a Map<String, Value>);

impl<'a> AuthUser<'a> {
    fn text(&self, key: &str) -> Option<&'a str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&'a str> {
        self.text("id")
    }

    pub fn email(&self) -> Option<&'a str> {
        self.text("email")
    }

    pub fn name(&self) -> Option<&'a str> {
        self.text("name")
    }

    pub fn filepath(&self) -> Option<&'a str> {
        self.text("filepath")
    }

    pub fn creatureid(&self) -> Option<&'a str> {
        self.text("creatureid")
    }

    pub fn nb_tasks_completed(&self) -> Option<u64> {
        self.0.get("nb_tasks_completed").and_then(Value::as_u64)
    }

    /// String entries of `tasks`; anything else in the list is skipped.
    pub fn tasks(&self) -> Vec<&'a str> {
        self.0
            .get("tasks")
            .and_then(Value::as_array)
            .map(|tasks| tasks.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginPayload<'a> {
    pub email: &'a str,
    pub mdp: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterPayload<'a> {
    pub email: &'a str,
    pub mdp: &'a str,
    pub name: &'a str,
    pub filepath: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GenerateTasksPayload<'a> {
    pub user_id: &'a str,
    pub context: &'a str,
    pub time: u32,
    pub mood: &'static str,
    pub energy_level: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateTasksResponse {
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Deserialize)]
struct RawVerifyOutcome {
    #[serde(default)]
    valid: Option<bool>,
    #[serde(default)]
    verified: Option<bool>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

impl From<RawVerifyOutcome> for VerifyOutcome {
    fn from(raw: RawVerifyOutcome) -> Self {
        Self {
            verified: raw.valid.unwrap_or(false) || raw.verified.unwrap_or(false),
            reason: raw.reason,
            message: raw.message,
            confidence: raw.confidence,
        }
    }
}

/// Result of a proof upload. The dashboard backend answers with `valid`,
/// older deployments with `verified`; either flag set means accepted.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(from = "RawVerifyOutcome")]
pub struct VerifyOutcome {
    pub verified: bool,
    pub reason: Option<String>,
    pub message: Option<String>,
    pub confidence: Option<f64>,
}

impl VerifyOutcome {
    pub fn display_confidence(&self) -> f64 {
        self.confidence
            .filter(|value| value.is_finite())
            .map_or(0.0, |value| value.clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mood {
    #[default]
    Ok,
    Happy,
    Stressed,
    Tired,
    Motivated,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Ok,
        Mood::Happy,
        Mood::Motivated,
        Mood::Tired,
        Mood::Stressed,
    ];

    /// Unknown labels read as `Ok`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Happy :)" => Self::Happy,
            "Stressed :(" => Self::Stressed,
            "Tired zZ" => Self::Tired,
            "Motivated!" => Self::Motivated,
            _ => Self::Ok,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK :/",
            Self::Happy => "Happy :)",
            Self::Stressed => "Stressed :(",
            Self::Tired => "Tired zZ",
            Self::Motivated => "Motivated!",
        }
    }

    pub fn wire_token(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Happy => "happy",
            Self::Stressed => "stressed",
            Self::Tired => "tired",
            Self::Motivated => "motivated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl EnergyLevel {
    pub const ALL: [EnergyLevel; 3] = [EnergyLevel::Low, EnergyLevel::Medium, EnergyLevel::High];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn wire_token(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}
