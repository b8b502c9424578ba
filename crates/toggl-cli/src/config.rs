//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// `TOGGL_*` values such as `2024` or `true` arrive typed from figment, so
/// every text field also accepts numbers and booleans.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Toggl API token (`TOGGL_API_TOKEN`).
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub api_token: Option<String>,
    /// Base URL of the Toggl v9 API.
    #[serde(deserialize_with = "lenient::string")]
    pub api_url: String,
    /// Path to the local project store.
    #[serde(deserialize_with = "lenient::path")]
    pub store_path: PathBuf,
    /// Client whose projects are listed after all other clients.
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub default_client: Option<String>,
    /// Value sent as `created_with` on new time entries.
    #[serde(deserialize_with = "lenient::string")]
    pub created_with: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("store_path", &self.store_path)
            .field("default_client", &self.default_client)
            .field("created_with", &self.created_with)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            api_token: None,
            api_url: toggl_api::DEFAULT_BASE_URL.to_string(),
            store_path: data_dir.join("projects.json"),
            default_client: None,
            created_with: "toggl-cli".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TOGGL_*)
        figment = figment.merge(Env::prefixed("TOGGL_"));

        figment.extract()
    }

    /// Returns the API token, failing when it is unset or blank.
    pub fn api_token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("missing Toggl API token (set TOGGL_API_TOKEN or api_token in config.toml)")
            })
    }
}

/// Returns the platform-specific config directory for toggl.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("toggl"))
}

/// Returns the platform-specific data directory for toggl.
///
/// On Linux: `~/.local/share/toggl`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("toggl"))
}

/// Deserializers that read scalar config values back as text.
mod lenient {
    use std::path::PathBuf;

    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Bool(bool),
    }

    impl From<Scalar> for String {
        fn from(value: Scalar) -> Self {
            match value {
                Scalar::Text(text) => text,
                Scalar::Unsigned(n) => n.to_string(),
                Scalar::Signed(n) => n.to_string(),
                Scalar::Float(n) => n.to_string(),
                Scalar::Bool(b) => b.to_string(),
            }
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Scalar::deserialize(deserializer).map(String::from)
    }

    pub fn optional_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
    }

    pub fn path<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PathBuf, D::Error> {
        string(deserializer).map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use figment::Jail;

    /// Runs `test` with a fresh `HOME` and no inherited environment.
    fn with_clean_env(test: impl FnOnce(&mut Jail) -> figment::error::Result<()>) {
        Jail::expect_with(|jail| {
            let home = jail.directory().to_path_buf();
            jail.clear_env();
            jail.set_env("HOME", home.display());
            test(jail)
        });
    }

    #[test]
    fn test_dirs_data_path_ends_with_toggl() {
        with_clean_env(|_| {
            let path = dirs_data_path().unwrap();
            assert_eq!(path.file_name().unwrap(), "toggl");
            Ok(())
        });
    }

    #[test]
    fn test_default_config_uses_data_dir_for_store() {
        with_clean_env(|_| {
            let config = Config::default();
            let data_dir = dirs_data_path().unwrap();
            assert_eq!(config.store_path, data_dir.join("projects.json"));
            assert_eq!(config.api_url, "https://api.track.toggl.com/api/v9");
            assert_eq!(config.created_with, "toggl-cli");
            Ok(())
        });
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        with_clean_env(|jail| {
            jail.create_file(
                "custom.toml",
                "default_client = \"Home Co\"\ncreated_with = \"my-script\"\n",
            )?;

            let config = Config::load_from(Some(Path::new("custom.toml")))?;
            assert_eq!(config.default_client.as_deref(), Some("Home Co"));
            assert_eq!(config.created_with, "my-script");
            assert_eq!(config.api_token, None);
            Ok(())
        });
    }

    #[test]
    fn test_layers_override_in_order() {
        with_clean_env(|jail| {
            let home_dir = dirs_config_path().unwrap();
            fs::create_dir_all(&home_dir).unwrap();
            fs::write(
                home_dir.join("config.toml"),
                "default_client = \"Home\"\ncreated_with = \"home\"\napi_url = \"http://home\"\n",
            )
            .unwrap();
            jail.create_file(
                "explicit.toml",
                "default_client = \"Explicit\"\ncreated_with = \"explicit\"\n",
            )?;
            let explicit = Path::new("explicit.toml");

            let config = Config::load_from(None)?;
            assert_eq!(config.default_client.as_deref(), Some("Home"));
            assert_eq!(config.created_with, "home");
            assert_eq!(config.api_url, "http://home");

            let config = Config::load_from(Some(explicit))?;
            assert_eq!(config.default_client.as_deref(), Some("Explicit"));
            assert_eq!(config.created_with, "explicit");
            assert_eq!(config.api_url, "http://home");

            jail.set_env("TOGGL_DEFAULT_CLIENT", "Env");
            let config = Config::load_from(Some(explicit))?;
            assert_eq!(config.default_client.as_deref(), Some("Env"));
            assert_eq!(config.created_with, "explicit");
            assert_eq!(config.api_url, "http://home");
            Ok(())
        });
    }

    #[test]
    fn test_env_numbers_and_booleans_read_as_text() {
        with_clean_env(|jail| {
            jail.set_env("TOGGL_API_TOKEN", "1234567890");
            jail.set_env("TOGGL_DEFAULT_CLIENT", "2024");
            jail.set_env("TOGGL_CREATED_WITH", "true");
            jail.set_env("TOGGL_STORE_PATH", "42");

            let config = Config::load_from(None)?;
            assert_eq!(config.api_token().unwrap(), "1234567890");
            assert_eq!(config.default_client.as_deref(), Some("2024"));
            assert_eq!(config.created_with, "true");
            assert_eq!(config.store_path, PathBuf::from("42"));
            Ok(())
        });
    }

    #[test]
    fn test_api_token_rejects_blank() {
        let config = Config {
            api_token: Some("  ".to_string()),
            ..Config::default()
        };
        let err = config.api_token().unwrap_err();
        assert!(err.to_string().contains("TOGGL_API_TOKEN"));

        let config = Config {
            api_token: Some("abc".to_string()),
            ..Config::default()
        };
        assert_eq!(config.api_token().unwrap(), "abc");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config {
            api_token: Some("super-secret".to_string()),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
