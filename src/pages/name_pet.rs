use super::{SubmitOutcome, filled};
use crate::egg::EggVariant;
use crate::navigation::{NavigationPayload, Navigator, Route};

/// Names the companion hatched from `egg` and hands both to the dashboard.
#[derive(Debug, Clone, Default)]
pub struct NamePetPage {
    pub name: String,
    egg: EggVariant,
}

impl NamePetPage {
    pub fn new(egg: Option<EggVariant>) -> Self {
        Self {
            name: String::new(),
            egg: egg.unwrap_or_default(),
        }
    }

    pub fn egg(&self) -> EggVariant {
        self.egg
    }

    pub fn can_submit(&self) -> bool {
        filled(&self.name)
    }

    pub fn submit(&mut self, nav: &mut impl Navigator) -> SubmitOutcome {
        if !self.can_submit() {
            return SubmitOutcome::Blocked;
        }
        nav.navigate(Route::Dashboard(NavigationPayload {
            egg: Some(self.egg),
            name: Some(self.name.trim().to_owned()),
            ..NavigationPayload::default()
        }));
        SubmitOutcome::Completed
    }
}
