use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const ENV_PREFIX: &str = "TICKETDESK";

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub service: ServiceConfig,
    pub preferences: Preferences,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Preferences {
    pub confirm_close: bool,
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            preferences: Preferences {
                confirm_close: true,
                color: true,
            },
        }
    }
}

impl Settings {
    /// Defaults, then `~/.ticketdesk/config.toml` if present, then
    /// `TICKETDESK__SECTION__FIELD` environment variables.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        Self::load_with_env(config_path, None)
    }

    /// Like [`Self::load_from`], reading overrides from `env` instead of the
    /// process environment when it is given.
    pub fn load_with_env(
        config_path: &Path,
        env: Option<::config::Map<String, String>>,
    ) -> Result<Self> {
        let settings = ::config::Config::builder()
            .set_default("service.base_url", DEFAULT_BASE_URL)?
            .set_default("preferences.confirm_close", true)?
            .set_default("preferences.color", true)?
            .add_source(
                ::config::File::from(config_path.to_path_buf())
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .context("Failed to read config file")?;

        let settings: Settings = settings
            .try_deserialize()
            .context("Failed to parse config file")?;

        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(config_path, config_str)
            .context("Failed to write config file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(config_path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(config_path, perms)?;
        }

        Ok(())
    }

    /// Applies `section.field = value`. Returns `false` for an unknown key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool> {
        match key {
            "service.base_url" => {
                let url = value.trim().trim_end_matches('/');
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("service.base_url must start with http:// or https://");
                }
                self.service.base_url = url.to_string();
            }
            "preferences.confirm_close" => {
                self.preferences.confirm_close = parse_bool(value)?;
            }
            "preferences.color" => {
                self.preferences.color = parse_bool(value)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".ticketdesk"))
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        other => anyhow::bail!("Expected true or false, got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> Option<::config::Map<String, String>> {
        Some(::config::Map::new())
    }

    fn temp_config(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("ticketdesk-test-{}-{}", name, std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn test_config_serialization() {
        let settings = Settings {
            service: ServiceConfig {
                base_url: "http://desk.example.com:5000".to_string(),
            },
            preferences: Preferences {
                confirm_close: false,
                color: true,
            },
        };

        let toml_str = toml::to_string(&settings).unwrap();
        assert!(toml_str.contains("http://desk.example.com:5000"));

        let deserialized: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.service.base_url, "http://desk.example.com:5000");
        assert!(!deserialized.preferences.confirm_close);
    }

    #[test]
    fn test_config_load_missing_file_uses_defaults() {
        let path = temp_config("missing");
        let settings = Settings::load_with_env(&path, no_env()).unwrap();
        assert_eq!(settings.service.base_url, DEFAULT_BASE_URL);
        assert!(settings.preferences.confirm_close);
        assert!(settings.preferences.color);
    }

    #[test]
    fn test_config_save_and_reload() {
        let path = temp_config("roundtrip");
        let mut settings = Settings::default();
        assert!(settings.set("service.base_url", "http://10.0.0.5:5000/").unwrap());
        assert!(settings.set("preferences.confirm_close", "no").unwrap());
        settings.save_to(&path).unwrap();

        let reloaded = Settings::load_with_env(&path, no_env()).unwrap();
        assert_eq!(reloaded.service.base_url, "http://10.0.0.5:5000");
        assert!(!reloaded.preferences.confirm_close);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let path = temp_config("partial");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[preferences]\ncolor = false\n").unwrap();

        let settings = Settings::load_with_env(&path, no_env()).unwrap();
        assert!(!settings.preferences.color);
        assert!(settings.preferences.confirm_close);
        assert_eq!(settings.service.base_url, DEFAULT_BASE_URL);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        let path = temp_config("env");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            "[service]\nbase_url = \"http://file.example.com:5000\"\n[preferences]\nconfirm_close = true\n",
        )
        .unwrap();

        let mut env = ::config::Map::new();
        env.insert(
            "TICKETDESK__SERVICE__BASE_URL".to_string(),
            "http://env.example.com:5000".to_string(),
        );
        env.insert(
            "TICKETDESK__PREFERENCES__CONFIRM_CLOSE".to_string(),
            "false".to_string(),
        );

        let settings = Settings::load_with_env(&path, Some(env)).unwrap();
        assert_eq!(settings.service.base_url, "http://env.example.com:5000");
        assert!(!settings.preferences.confirm_close);
        assert!(settings.preferences.color);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut settings = Settings::default();
        assert!(settings.set("service.base_url", "localhost:5000").is_err());
        assert!(settings.set("preferences.color", "maybe").is_err());
        assert!(!settings.set("service.timeout", "30").unwrap());
    }
}
