use log::LevelFilter;

pub const DEFAULT_TEAM: &str = "Chicago Cubs";

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Name, abbreviation or alias of the club shown on startup.
    pub team: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            team: DEFAULT_TEAM.to_string(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            full_screen: defaults.full_screen,
            log_level: var("MLBTUI_LOG").and_then(|level| level.parse().ok()),
            team: var("MLBTUI_TEAM").unwrap_or(defaults.team),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_team_and_level() {
        let settings = AppSettings::from_lookup(|key| match key {
            "MLBTUI_TEAM" => Some(" NYY ".to_string()),
            "MLBTUI_LOG" => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(settings.team, "NYY");
        assert_eq!(settings.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn blank_or_bad_values_keep_defaults() {
        let settings = AppSettings::from_lookup(|key| match key {
            "MLBTUI_TEAM" => Some("  ".to_string()),
            "MLBTUI_LOG" => Some("loud".to_string()),
            _ => None,
        });
        assert_eq!(settings.team, DEFAULT_TEAM);
        assert_eq!(settings.log_level, None);
    }
}
