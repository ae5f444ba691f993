use serde::{Deserialize, Serialize};

/// A named timer configuration, durations in minutes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub work: u32,
    #[serde(rename = "shortBreak")]
    pub short_break: u32,
    #[serde(rename = "longBreak")]
    pub long_break: u32,
}

impl Preset {
    fn new(id: &str, name: &str, work: u32, short_break: u32, long_break: u32) -> Self {
        Preset {
            id: id.to_string(),
            name: name.to_string(),
            work,
            short_break,
            long_break,
        }
    }
}

/// Per-user settings. Stored as a single document keyed by the owner's id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    #[serde(rename = "user_id", default)]
    pub owner_id: String,
    /// Daily focus target in minutes.
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub last_study_date: Option<String>,
    #[serde(default = "default_presets")]
    pub presets: Vec<Preset>,
}

pub const SETTINGS_COLLECTION: &str = "settings";

fn default_daily_goal() -> u32 {
    120
}

fn default_presets() -> Vec<Preset> {
    vec![
        Preset::new("classic", "Classic", 25, 5, 15),
        Preset::new("short", "Short", 15, 3, 10),
        Preset::new("long", "Deep", 50, 10, 30),
    ]
}

impl Settings {
    /// Default settings owned by `owner_id`.
    pub fn default_for(owner_id: impl Into<String>) -> Self {
        Settings {
            owner_id: owner_id.into(),
            daily_goal: default_daily_goal(),
            current_streak: 0,
            last_study_date: None,
            presets: default_presets(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_parses_to_defaults() {
        let settings: Settings = serde_json::from_str("{}").expect("empty body should parse");
        assert_eq!(settings, Settings::default_for(""));
    }

    #[test]
    fn test_default_presets() {
        let settings = Settings::default_for("u1");
        let ids: Vec<&str> = settings.presets.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(settings.daily_goal, 120);
        assert_eq!(ids, vec!["classic", "short", "long"]);
        assert_eq!(settings.presets[2].name, "Deep");
        assert_eq!(settings.presets[2].work, 50);
    }

    #[test]
    fn test_preset_break_fields_use_camel_case() {
        let json = serde_json::to_value(Settings::default_for("u1")).expect("should serialize");
        assert_eq!(json["presets"][0]["shortBreak"], 5);
        assert_eq!(json["presets"][0]["longBreak"], 15);
    }
}
