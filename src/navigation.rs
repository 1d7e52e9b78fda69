use crate::egg::EggVariant;
use tracing::warn;
use url::form_urlencoded;

pub const DEFAULT_PET_NAME: &str = "Pablo";

/// State carried to the dashboard in its query string. Every field is
/// optional on the wire; the accessors apply the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationPayload {
    pub egg: Option<EggVariant>,
    pub name: Option<String>,
    pub tasks: Option<Vec<String>>,
    pub user_id: Option<String>,
}

impl NavigationPayload {
    pub fn egg(&self) -> EggVariant {
        self.egg.unwrap_or_default()
    }

    pub fn pet_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_PET_NAME)
    }

    pub fn tasks(&self) -> &[String] {
        self.tasks.as_deref().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn encode(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(egg) = self.egg {
            query.append_pair("egg", &egg.number().to_string());
        }
        if let Some(name) = &self.name {
            query.append_pair("name", name);
        }
        if let Some(tasks) = &self.tasks {
            // A Vec<String> always serializes.
            let encoded = serde_json::to_string(tasks).unwrap_or_else(|_| "[]".to_owned());
            query.append_pair("tasks", &encoded);
        }
        if let Some(user_id) = &self.user_id {
            query.append_pair("user_id", user_id);
        }
        query.finish()
    }

    /// Unknown keys are ignored, an unrecognised egg is dropped and a task
    /// list that is not a JSON array of strings reads as empty.
    pub fn decode(query: &str) -> Self {
        let mut payload = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "egg" => payload.egg = EggVariant::from_param(&value),
                "name" => payload.name = Some(value.into_owned()),
                "tasks" => {
                    payload.tasks = Some(serde_json::from_str(&value).unwrap_or_else(|err| {
                        warn!("ignoring malformed task list: {err}");
                        Vec::new()
                    }))
                }
                "user_id" => {
                    payload.user_id = Some(value.trim().to_owned()).filter(|id| !id.is_empty())
                }
                _ => {}
            }
        }
        payload
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    NamePet { egg: Option<EggVariant> },
    Dashboard(NavigationPayload),
    NewGoal,
    Verify,
}

impl Route {
    pub fn dashboard() -> Self {
        Self::Dashboard(NavigationPayload::default())
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_owned(),
            Self::Register => "/register".to_owned(),
            Self::NamePet { egg: None } => "/name".to_owned(),
            Self::NamePet { egg: Some(egg) } => format!("/name?egg={}", egg.number()),
            Self::Dashboard(payload) if payload.is_empty() => "/dashboard".to_owned(),
            Self::Dashboard(payload) => format!("/dashboard?{}", payload.encode()),
            Self::NewGoal => "/tasks/new".to_owned(),
            Self::Verify => "/verify".to_owned(),
        }
    }

    /// Resolves a location such as `/dashboard?egg=1`. The root and any
    /// unknown path land on the login screen.
    pub fn parse(location: &str) -> Self {
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        match path.trim_end_matches('/') {
            "/register" => Self::Register,
            "/name" => Self::NamePet {
                egg: NavigationPayload::decode(query).egg,
            },
            "/dashboard" => Self::Dashboard(NavigationPayload::decode(query)),
            "/tasks/new" => Self::NewGoal,
            "/verify" => Self::Verify,
            _ => Self::Login,
        }
    }
}

pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// History of visited routes, newest last.
impl Navigator for Vec<Route> {
    fn navigate(&mut self, route: Route) {
        self.push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let payload = NavigationPayload::decode("");
        assert_eq!(payload.egg(), EggVariant::Two);
        assert_eq!(payload.pet_name(), "Pablo");
        assert!(payload.tasks().is_empty());
        assert_eq!(payload.user_id, None);
    }

    #[test]
    fn encodes_and_decodes_task_lists() {
        let payload = NavigationPayload {
            egg: Some(EggVariant::Two),
            name: Some("Blopa".to_owned()),
            tasks: Some(vec![
                "Drink a glass of water".to_owned(),
                "Write 3 lines & stop?".to_owned(),
            ]),
            user_id: None,
        };
        let query = payload.encode();
        assert!(query.starts_with("egg=2&name=Blopa&tasks="));
        assert_eq!(NavigationPayload::decode(&query), payload);
    }

    #[test]
    fn malformed_values_fall_back() {
        let payload = NavigationPayload::decode("?egg=7&name=%20%20&tasks=%5Bbroken");
        assert_eq!(payload.egg, None);
        assert_eq!(payload.egg(), EggVariant::Two);
        assert_eq!(payload.pet_name(), "Pablo");
        assert_eq!(payload.tasks, Some(Vec::new()));

        let numbers = NavigationPayload::decode("tasks=%5B1%2C2%5D");
        assert!(numbers.tasks().is_empty());
    }

    #[test]
    fn routes_round_trip_through_paths() {
        let route = Route::Dashboard(NavigationPayload {
            egg: Some(EggVariant::One),
            name: Some("Mochi".to_owned()),
            ..NavigationPayload::default()
        });
        assert_eq!(route.path(), "/dashboard?egg=1&name=Mochi");
        assert_eq!(Route::parse(&route.path()), route);
        assert_eq!(Route::dashboard().path(), "/dashboard");
    }

    #[test]
    fn unknown_paths_go_to_login() {
        assert_eq!(Route::parse("/"), Route::Login);
        assert_eq!(Route::parse("/nowhere"), Route::Login);
        assert_eq!(Route::parse("/tasks/new"), Route::NewGoal);
        assert_eq!(
            Route::parse("/name?egg=3"),
            Route::NamePet {
                egg: Some(EggVariant::Three)
            }
        );
    }
}
