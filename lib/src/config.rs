use std::collections::HashMap;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/driftmail/driftmail.toml";
pub const DEFAULT_URL: &str = "https://api.driftmail.io";
pub const DEFAULT_API_VERSION: &str = "1";

const ENV_PREFIX: &str = "DRIFTMAIL";

/// Process-wide client settings. All operations read these at call
/// time; there is no other shared state.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub url: String,
    pub api_version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            url: DEFAULT_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl Config {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            ..Default::default()
        }
    }

    /// Applies known keys from a settings map on top of the defaults.
    /// Unknown keys are ignored.
    pub fn from_settings(settings: &HashMap<String, String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = settings.get("api_key") {
            config.api_key = v.clone();
        }
        if let Some(v) = settings.get("url") {
            config.url = v.clone();
        }
        if let Some(v) = settings.get("api_version") {
            config.api_version = v.clone();
        }

        config
    }
}

/// Loads Driftmail config from filesystem and merges it with any
/// environment variables prefixed with DRIFTMAIL_.
///
/// This function will panic on error.
pub fn load_config(path: Option<&str>) -> HashMap<String, String> {
    let mut settings = config::Config::default();

    settings
        .merge(config::File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)))
        .unwrap()
        .merge(config::Environment::with_prefix(ENV_PREFIX))
        .unwrap();

    settings.try_into::<HashMap<String, String>>().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert!(config.api_key.is_empty());
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_from_settings_overrides() {
        let mut settings = HashMap::new();
        settings.insert("api_key".to_string(), "STUFF_AND_THINGS".to_string());
        settings.insert("url".to_string(), "https://staging.driftmail.io".to_string());

        let config = Config::from_settings(&settings);

        assert_eq!(config.api_key, "STUFF_AND_THINGS");
        assert_eq!(config.url, "https://staging.driftmail.io");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_from_settings_ignores_unknown_keys() {
        let mut settings = HashMap::new();
        settings.insert("api_key".to_string(), "CONFIG_TEST".to_string());
        settings.insert("debug".to_string(), "true".to_string());

        let config = Config::from_settings(&settings);

        assert_eq!(config.api_key, "CONFIG_TEST");
        assert_eq!(config.url, DEFAULT_URL);
    }
}
