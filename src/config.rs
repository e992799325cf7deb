use std::collections::HashMap;
use std::env;
use std::fs;

/// Key/value configuration from an env-style file (`KEY=VALUE`, `#`
/// comments, optional `export ` prefixes and quoting). Lookups fall back
/// to the process environment, so the file only needs the overrides.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    /// Loads the file named by `CONFIG_FILE` if set, otherwise an empty
    /// config (pure-environment operation). An unreadable file degrades to
    /// empty rather than failing startup.
    pub fn load() -> Self {
        match env::var("CONFIG_FILE") {
            Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
            Err(_) => AppConfig::default(),
        }
    }

    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| env::var(key).ok())
    }

    pub fn require(&self, key: &str) -> Result<String, String> {
        self.get(key)
            .ok_or_else(|| format!("{} must be set (environment or config file)", key))
    }
}
