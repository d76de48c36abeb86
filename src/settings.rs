//! Game settings and preferences
//!
//! Held in memory for the page session. Loaded from JSON or from URL query
//! parameters on the web build.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name of the profile selected on load
    pub difficulty: String,

    // === Visual Effects ===
    /// Screen shake on chaos profiles
    pub screen_shake: bool,
    /// Random white flashes on chaos profiles
    pub flashes: bool,
    /// Floating distractions on chaos profiles
    pub distractions: bool,

    // === Debug ===
    /// Outline hitboxes over the sprites
    pub show_hitboxes: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, flashes or distractions)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: "Medium".to_string(),

            screen_shake: true,
            flashes: true,
            distractions: true,

            show_hitboxes: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective flashes (respects reduced_motion)
    pub fn effective_flashes(&self) -> bool {
        self.flashes && !self.reduced_motion
    }

    /// Effective distractions (respects reduced_motion)
    pub fn effective_distractions(&self) -> bool {
        self.distractions && !self.reduced_motion
    }

    /// Apply overrides from a URL query such as `?difficulty=easy&debug=1`.
    ///
    /// Unknown keys and unparseable values are logged and skipped.
    pub fn apply_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, "1"));
            match key {
                "difficulty" => self.difficulty = value.to_string(),
                "debug" | "hitboxes" => self.set_flag(key, value, |s, v| s.show_hitboxes = v),
                "reduced_motion" => self.set_flag(key, value, |s, v| s.reduced_motion = v),
                "shake" => self.set_flag(key, value, |s, v| s.screen_shake = v),
                "flashes" => self.set_flag(key, value, |s, v| s.flashes = v),
                "distractions" => self.set_flag(key, value, |s, v| s.distractions = v),
                _ => log::warn!("Ignoring unknown setting `{}`", key),
            }
        }
    }

    fn set_flag(&mut self, key: &str, value: &str, apply: impl FnOnce(&mut Self, bool)) {
        match parse_flag(value) {
            Some(v) => apply(self, v),
            None => log::warn!("Ignoring setting `{}`: `{}` is not a boolean", key, value),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_overrides_effects() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_screen_shake());
        assert!(!settings.effective_flashes());
        assert!(!settings.effective_distractions());
        assert!(Settings::default().effective_screen_shake());
    }

    #[test]
    fn test_apply_query() {
        let mut settings = Settings::default();
        settings.apply_query("?difficulty=Extreme&debug&shake=off&bogus=1&flashes=maybe");
        assert_eq!(settings.difficulty, "Extreme");
        assert!(settings.show_hitboxes);
        assert!(!settings.screen_shake);
        assert!(settings.flashes);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "reduced_motion": true }"#).unwrap();
        assert!(settings.reduced_motion);
        assert_eq!(settings.difficulty, "Medium");
        assert!(Settings::from_json("[1, 2]").is_err());
    }
}
