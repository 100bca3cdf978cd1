use std::{fs, path::Path};

use assistant_core::view::DEFAULT_FILTERS;
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "kitchen.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub voice_lang: String,
    pub filters: Vec<String>,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            request_timeout_secs: 10,
            voice_lang: "en-US".into(),
            filters: DEFAULT_FILTERS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    voice_lang: Option<String>,
    filters: Option<Vec<String>>,
}

/// Defaults, then `path` if it exists, then the environment.
pub fn load_settings(path: &Path) -> ConsoleSettings {
    let mut settings = ConsoleSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut ConsoleSettings, raw: &str) {
    let file_cfg = match toml::from_str::<FileConfig>(raw) {
        Ok(cfg) => cfg,
        Err(err) => {
            warn!(error = %err, "ignoring unreadable config file");
            return;
        }
    };

    if let Some(v) = file_cfg.base_url.filter(|v| !v.trim().is_empty()) {
        settings.base_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs.filter(|v| *v > 0) {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.voice_lang.filter(|v| !v.trim().is_empty()) {
        settings.voice_lang = v;
    }
    if let Some(v) = file_cfg.filters.filter(|v| !v.is_empty()) {
        settings.filters = v;
    }
}

fn apply_env(settings: &mut ConsoleSettings, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("KITCHEN_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = non_empty("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = non_empty("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.request_timeout_secs = parsed,
            _ => warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    if let Some(v) = non_empty("APP__VOICE_LANG") {
        settings.voice_lang = v;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let settings = ConsoleSettings::default();
        assert_eq!(settings.base_url, "http://127.0.0.1:5000");
        assert_eq!(settings.request_timeout_secs, 10);
        assert_eq!(settings.voice_lang, "en-US");
        assert_eq!(
            settings.filters,
            vec!["all", "vegetarian", "non-vegetarian", "sweet"]
        );
    }

    #[test]
    fn file_overrides_defaults() {
        let mut settings = ConsoleSettings::default();
        apply_file(
            &mut settings,
            r#"
                base_url = "http://kitchen.local:8080"
                request_timeout_secs = 3
                filters = ["all", "breakfast"]
            "#,
        );
        assert_eq!(settings.base_url, "http://kitchen.local:8080");
        assert_eq!(settings.request_timeout_secs, 3);
        assert_eq!(settings.voice_lang, "en-US");
        assert_eq!(settings.filters, vec!["all", "breakfast"]);
    }

    #[test]
    fn invalid_file_is_ignored() {
        let mut settings = ConsoleSettings::default();
        apply_file(&mut settings, "base_url = [");
        assert_eq!(settings, ConsoleSettings::default());

        apply_file(&mut settings, "request_timeout_secs = 0\nfilters = []");
        assert_eq!(settings, ConsoleSettings::default());
    }

    #[test]
    fn env_overrides_file_and_prefers_app_prefix() {
        let mut settings = ConsoleSettings::default();
        apply_file(&mut settings, r#"base_url = "http://from-file""#);
        apply_env(
            &mut settings,
            env_of(&[
                ("KITCHEN_BASE_URL", "http://kitchen-env"),
                ("APP__BASE_URL", "http://app-env"),
                ("APP__VOICE_LANG", "en-GB"),
            ]),
        );
        assert_eq!(settings.base_url, "http://app-env");
        assert_eq!(settings.voice_lang, "en-GB");
    }

    #[test]
    fn invalid_env_timeout_keeps_previous_value() {
        let mut settings = ConsoleSettings::default();
        apply_env(
            &mut settings,
            env_of(&[("APP__REQUEST_TIMEOUT_SECS", "soon")]),
        );
        assert_eq!(settings.request_timeout_secs, 10);

        apply_env(&mut settings, env_of(&[("APP__REQUEST_TIMEOUT_SECS", "25")]));
        assert_eq!(settings.request_timeout_secs, 25);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = load_settings(Path::new("/nonexistent/kitchen.toml"));
        assert!(settings.request_timeout_secs > 0);
        assert!(!settings.filters.is_empty());
    }
}
