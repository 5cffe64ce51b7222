/// Study subject selector. The set is closed; every mode maps to a fixed
/// system instruction that is static for the process lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StudyMode {
    #[default]
    General,
    Math,
    Physics,
    History,
    Code,
}

impl StudyMode {
    pub const ALL: [StudyMode; 5] = [
        StudyMode::General,
        StudyMode::Math,
        StudyMode::Physics,
        StudyMode::History,
        StudyMode::Code,
    ];

    /// Resolves a selector key, falling back to `General` for anything
    /// outside the closed set. Stale keys saved by older builds must not
    /// crash the session, so unknown input is never an error.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "math" => Self::Math,
            "physics" => Self::Physics,
            "history" => Self::History,
            "code" => Self::Code,
            _ => Self::General,
        }
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Math => "math",
            Self::Physics => "physics",
            Self::History => "history",
            Self::Code => "code",
        }
    }

    /// System instruction prepended to every request in this mode.
    #[must_use]
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::General => {
                "You are a helpful study assistant. Explain complex topics clearly and concisely in English."
            }
            Self::Math => {
                "You are a helpful math tutor. Work through problems step by step, state the reasoning behind each step, and keep answers concise."
            }
            Self::Physics => {
                "You are a helpful physics tutor. Explain concepts with intuitive examples, name the governing laws, and keep answers concise."
            }
            Self::History => {
                "You are a helpful history tutor. Place events in context, mention dates and causes, and keep answers concise."
            }
            Self::Code => {
                "You are a helpful programming tutor. Explain code and concepts clearly, prefer small examples, and keep answers concise."
            }
        }
    }
}
