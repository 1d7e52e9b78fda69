use rand::Rng;

/// Which egg asset represents the user's companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EggVariant {
    One,
    #[default]
    Two,
    Three,
}

impl EggVariant {
    pub const ALL: [EggVariant; 3] = [EggVariant::One, EggVariant::Two, EggVariant::Three];

    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    /// Accepts exactly `"1"`, `"2"` or `"3"`.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "1" => Some(Self::One),
            "2" => Some(Self::Two),
            "3" => Some(Self::Three),
            _ => None,
        }
    }

    /// Token sent as `filepath` at registration; it names the same asset the
    /// dashboard shows for this egg.
    pub fn file_token(self) -> String {
        format!("oeuf{}", self.number())
    }

    pub fn asset_path(self) -> String {
        format!("/assets/oeuf{}.png", self.number())
    }
}

pub trait EggSource: Send {
    fn pick(&mut self) -> EggVariant;
}

#[derive(Debug, Default)]
pub struct RandomEggs;

impl EggSource for RandomEggs {
    fn pick(&mut self) -> EggVariant {
        let index = rand::thread_rng().gen_range(0..EggVariant::ALL.len());
        EggVariant::ALL[index]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedEgg(pub EggVariant);

impl EggSource for FixedEgg {
    fn pick(&mut self) -> EggVariant {
        self.0
    }
}
