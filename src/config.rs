use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use tracing::warn;

use crate::services::debounce::DEFAULT_DELAY_MS;
use crate::services::deepl::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

const STORE_FILE: &str = "store.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub debounce: Duration,
    pub timeout: Duration,
    pub store_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = get("DEEPL_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let debounce_ms = parse_or(&get, "DEEPL_DEBOUNCE_MS", DEFAULT_DELAY_MS);
        let timeout_secs = parse_or(&get, "DEEPL_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);

        let store_path = get("DEEPL_STORE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_store_path);

        Config {
            api_url,
            debounce: Duration::from_millis(debounce_ms),
            timeout: Duration::from_secs(timeout_secs),
            store_path,
        }
    }
}

fn parse_or(get: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> u64 {
    match get(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, default, "not a number, using default");
            default
        }),
    }
}

fn default_store_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("com", "deepl-core", "deepl-core") {
        return dirs.data_dir().join(STORE_FILE);
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(STORE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[]);
        assert_eq!(c.api_url, DEFAULT_BASE_URL);
        assert_eq!(c.debounce, Duration::from_millis(500));
        assert_eq!(c.timeout, Duration::from_secs(60));
        assert!(c.store_path.ends_with(STORE_FILE));
    }

    #[test]
    fn overrides() {
        let c = config(&[
            ("DEEPL_API_URL", "https://api-free.deepl.com"),
            ("DEEPL_DEBOUNCE_MS", "250"),
            ("DEEPL_TIMEOUT_SECS", " 5 "),
            ("DEEPL_STORE_PATH", "/tmp/keys.json"),
        ]);
        assert_eq!(c.api_url, "https://api-free.deepl.com");
        assert_eq!(c.debounce, Duration::from_millis(250));
        assert_eq!(c.timeout, Duration::from_secs(5));
        assert_eq!(c.store_path, PathBuf::from("/tmp/keys.json"));
    }

    #[test]
    fn garbage_numbers_fall_back() {
        let c = config(&[("DEEPL_DEBOUNCE_MS", "soon")]);
        assert_eq!(c.debounce, Duration::from_millis(DEFAULT_DELAY_MS));
    }
}
