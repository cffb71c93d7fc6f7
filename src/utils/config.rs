use std::path::Path;

use crate::models::Settings;

const ENV_API_KEY: &str = "NVIDIA_API_KEY";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

pub fn api_key_from_env() -> Option<String> {
    std::env::var(ENV_API_KEY)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn resolve_api_key(explicit_key: &str) -> String {
    let trimmed = explicit_key.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    api_key_from_env().unwrap_or_default()
}

pub fn apply_env_defaults(settings: &mut Settings) {
    if settings.ai.api_key.trim().is_empty() {
        settings.ai.api_key = api_key_from_env().unwrap_or_default();
    }
}

/// Settings live next to the database as config/settings.json; a missing or
/// unreadable file falls back to defaults.
pub fn load_settings(data_dir: &Path) -> Settings {
    let settings_path = data_dir.join("config").join("settings.json");
    let mut settings = if settings_path.exists() {
        std::fs::read_to_string(&settings_path)
            .ok()
            .and_then(|data| serde_json::from_str::<Settings>(&data).ok())
            .unwrap_or_else(|| {
                log::warn!("unreadable settings at {}, using defaults", settings_path.display());
                Settings::default()
            })
    } else {
        Settings::default()
    };
    apply_env_defaults(&mut settings);
    settings
}
