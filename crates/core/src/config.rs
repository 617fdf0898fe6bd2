//! Runtime settings.
//!
//! Layers apply in order: built-in defaults, the TOML file (`wellora.toml` or
//! `config/wellora.toml`, with `${VAR}` interpolation), `WELLORA_*`
//! environment variables, then [`ConfigOverrides`]. Validation runs last.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE_CANDIDATES: [&str; 2] = ["wellora.toml", "config/wellora.toml"];

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: "sqlite://wellora.db".to_string(), max_connections: 5, timeout_secs: 30 }
    }
}

/// Locations of the read-only advice sources loaded at startup.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub skincare_path: PathBuf,
    pub hair_path: PathBuf,
    pub stress_tips_path: PathBuf,
    pub menstrual_guide_path: PathBuf,
    pub pregnancy_guide_path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            skincare_path: PathBuf::from("data/skincare_catalog.json"),
            hair_path: PathBuf::from("data/hair_catalog.json"),
            stress_tips_path: PathBuf::from("data/stress_tips.json"),
            menstrual_guide_path: PathBuf::from("data/menstrual_guide.json"),
            pregnancy_guide_path: PathBuf::from("data/pregnancy_guide.json"),
        }
    }
}

impl CatalogConfig {
    fn paths(&self) -> [(&'static str, &Path); 5] {
        [
            ("catalog.skincare_path", &self.skincare_path),
            ("catalog.hair_path", &self.hair_path),
            ("catalog.stress_tips_path", &self.stress_tips_path),
            ("catalog.menstrual_guide_path", &self.menstrual_guide_path),
            ("catalog.pregnancy_guide_path", &self.pregnancy_guide_path),
        ]
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_address: String,
    pub health_check_port: u16,
    pub graceful_shutdown_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            health_check_port: 8080,
            graceful_shutdown_secs: 15,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub catalog: Option<CatalogConfig>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// One effective value, as listed by `wellora config`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Setting {
    pub key: &'static str,
    pub env_var: &'static str,
    pub alias: Option<&'static str>,
    pub value: String,
}

struct SettingSpec {
    key: &'static str,
    env_var: &'static str,
    /// Older variable name, consulted only when `env_var` is unset.
    alias: Option<&'static str>,
    read: fn(&AppConfig) -> String,
    write: fn(&mut AppConfig, &str) -> Option<()>,
}

const SETTINGS: &[SettingSpec] = &[
    SettingSpec {
        key: "database.url",
        env_var: "WELLORA_DATABASE_URL",
        alias: None,
        read: |config| config.database.url.clone(),
        write: |config, value| {
            config.database.url = value.to_string();
            Some(())
        },
    },
    SettingSpec {
        key: "database.max_connections",
        env_var: "WELLORA_DATABASE_MAX_CONNECTIONS",
        alias: None,
        read: |config| config.database.max_connections.to_string(),
        write: |config, value| {
            config.database.max_connections = value.parse().ok()?;
            Some(())
        },
    },
    SettingSpec {
        key: "database.timeout_secs",
        env_var: "WELLORA_DATABASE_TIMEOUT_SECS",
        alias: None,
        read: |config| config.database.timeout_secs.to_string(),
        write: |config, value| {
            config.database.timeout_secs = value.parse().ok()?;
            Some(())
        },
    },
    SettingSpec {
        key: "catalog.skincare_path",
        env_var: "WELLORA_CATALOG_SKINCARE_PATH",
        alias: None,
        read: |config| config.catalog.skincare_path.display().to_string(),
        write: |config, value| {
            config.catalog.skincare_path = PathBuf::from(value);
            Some(())
        },
    },
    SettingSpec {
        key: "catalog.hair_path",
        env_var: "WELLORA_CATALOG_HAIR_PATH",
        alias: None,
        read: |config| config.catalog.hair_path.display().to_string(),
        write: |config, value| {
            config.catalog.hair_path = PathBuf::from(value);
            Some(())
        },
    },
    SettingSpec {
        key: "catalog.stress_tips_path",
        env_var: "WELLORA_CATALOG_STRESS_TIPS_PATH",
        alias: None,
        read: |config| config.catalog.stress_tips_path.display().to_string(),
        write: |config, value| {
            config.catalog.stress_tips_path = PathBuf::from(value);
            Some(())
        },
    },
    SettingSpec {
        key: "catalog.menstrual_guide_path",
        env_var: "WELLORA_CATALOG_MENSTRUAL_GUIDE_PATH",
        alias: None,
        read: |config| config.catalog.menstrual_guide_path.display().to_string(),
        write: |config, value| {
            config.catalog.menstrual_guide_path = PathBuf::from(value);
            Some(())
        },
    },
    SettingSpec {
        key: "catalog.pregnancy_guide_path",
        env_var: "WELLORA_CATALOG_PREGNANCY_GUIDE_PATH",
        alias: None,
        read: |config| config.catalog.pregnancy_guide_path.display().to_string(),
        write: |config, value| {
            config.catalog.pregnancy_guide_path = PathBuf::from(value);
            Some(())
        },
    },
    SettingSpec {
        key: "server.bind_address",
        env_var: "WELLORA_SERVER_BIND_ADDRESS",
        alias: None,
        read: |config| config.server.bind_address.clone(),
        write: |config, value| {
            config.server.bind_address = value.to_string();
            Some(())
        },
    },
    SettingSpec {
        key: "server.health_check_port",
        env_var: "WELLORA_SERVER_HEALTH_CHECK_PORT",
        alias: None,
        read: |config| config.server.health_check_port.to_string(),
        write: |config, value| {
            config.server.health_check_port = value.parse().ok()?;
            Some(())
        },
    },
    SettingSpec {
        key: "server.graceful_shutdown_secs",
        env_var: "WELLORA_SERVER_GRACEFUL_SHUTDOWN_SECS",
        alias: None,
        read: |config| config.server.graceful_shutdown_secs.to_string(),
        write: |config, value| {
            config.server.graceful_shutdown_secs = value.parse().ok()?;
            Some(())
        },
    },
    SettingSpec {
        key: "logging.level",
        env_var: "WELLORA_LOGGING_LEVEL",
        alias: Some("WELLORA_LOG_LEVEL"),
        read: |config| config.logging.level.clone(),
        write: |config, value| {
            config.logging.level = value.to_string();
            Some(())
        },
    },
    SettingSpec {
        key: "logging.format",
        env_var: "WELLORA_LOGGING_FORMAT",
        alias: Some("WELLORA_LOG_FORMAT"),
        read: |config| config.logging.format.as_str().to_string(),
        write: |config, value| {
            config.logging.format = value.parse().ok()?;
            Some(())
        },
    },
];

/// The first of `wellora.toml` and `config/wellora.toml` that exists.
pub fn discover_config_file() -> Option<PathBuf> {
    CONFIG_FILE_CANDIDATES.iter().map(PathBuf::from).find(|path| path.exists())
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let path = match options.config_path.as_deref() {
            Some(path) => path.exists().then(|| path.to_path_buf()),
            None => discover_config_file(),
        };

        let mut config = match path {
            Some(path) => read_file(&path)?,
            None if options.require_file => {
                let expected = options.config_path.unwrap_or_else(|| PathBuf::from("wellora.toml"));
                return Err(ConfigError::MissingConfigFile(expected));
            }
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Every setting with the variable that overrides it, in file order.
    pub fn settings(&self) -> Vec<Setting> {
        SETTINGS
            .iter()
            .map(|spec| Setting {
                key: spec.key,
                env_var: spec.env_var,
                alias: spec.alias,
                value: (spec.read)(self),
            })
            .collect()
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        for spec in SETTINGS {
            let (var, value) = match read_env(spec.env_var) {
                Some(value) => (spec.env_var, value),
                None => match spec.alias.and_then(|alias| read_env(alias).map(|v| (alias, v))) {
                    Some(found) => found,
                    None => continue,
                },
            };

            (spec.write)(self, value.trim())
                .ok_or_else(|| ConfigError::InvalidEnvOverride { key: var.to_string(), value })?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(catalog) = overrides.catalog {
            self.catalog = catalog;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.database.url.trim();
        if !(url.starts_with("sqlite:") || url == ":memory:") {
            return invalid("database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)");
        }
        if self.database.max_connections == 0 {
            return invalid("database.max_connections must be greater than zero");
        }
        if !(1..=300).contains(&self.database.timeout_secs) {
            return invalid("database.timeout_secs must be in range 1..=300");
        }

        if let Some((key, _)) =
            self.catalog.paths().into_iter().find(|(_, path)| path.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation(format!("{key} must not be empty")));
        }

        if self.server.health_check_port == 0 {
            return invalid("server.health_check_port must be greater than zero");
        }
        if self.server.graceful_shutdown_secs == 0 {
            return invalid("server.graceful_shutdown_secs must be greater than zero");
        }

        match self.logging.level.trim().to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => invalid("logging.level must be one of trace|debug|info|warn|error"),
        }
    }
}

fn invalid(message: &str) -> Result<(), ConfigError> {
    Err(ConfigError::Validation(message.to_string()))
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<AppConfig>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

/// Replaces every `${VAR}` with the variable's value; unset variables fail.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or(ConfigError::UnterminatedInterpolation)?;
        let var = &after[..end];
        let value = env::var(var)
            .map_err(|_| ConfigError::MissingEnvInterpolation { var: var.to_string() })?;
        output.push_str(&value);
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, MutexGuard};

    use tempfile::TempDir;

    use super::{
        interpolate_env_vars, AppConfig, CatalogConfig, ConfigError, ConfigOverrides, LoadOptions,
        LogFormat,
    };

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Sets `vars` for the duration of `body`, holding the process-wide lock.
    fn with_vars<T>(vars: &[(&str, &str)], body: impl FnOnce() -> T) -> T {
        let _guard: MutexGuard<'_, ()> =
            ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = body();
        for (key, _) in vars {
            env::remove_var(key);
        }
        result
    }

    fn load_file(dir: &TempDir, contents: &str) -> Result<AppConfig, ConfigError> {
        let path = dir.path().join("wellora.toml");
        fs::write(&path, contents).expect("write config");
        AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
    }

    #[test]
    fn defaults_point_at_bundled_data() {
        let config = with_vars(&[], || AppConfig::load(LoadOptions::default())).expect("defaults");

        assert_eq!(config.catalog.skincare_path, PathBuf::from("data/skincare_catalog.json"));
        assert_eq!(config.catalog.pregnancy_guide_path, PathBuf::from("data/pregnancy_guide.json"));
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.database.timeout_secs, 30);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = TempDir::new().expect("tempdir");
        let config = with_vars(&[("TEST_WELLORA_DATA_DIR", "/srv/wellora")], || {
            load_file(
                &dir,
                "[catalog]\nhair_path = \"${TEST_WELLORA_DATA_DIR}/hair.json\"\n\n[logging]\nformat = \"json\"\n",
            )
        })
        .expect("file config");

        assert_eq!(config.catalog.hair_path, PathBuf::from("/srv/wellora/hair.json"));
        assert_eq!(config.catalog.stress_tips_path, PathBuf::from("data/stress_tips.json"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.server.health_check_port, 8080);
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let result = with_vars(&[], || load_file(&dir, "[catalog]\nnails_path = \"x.json\"\n"));

        assert!(matches!(result, Err(ConfigError::ParseFile { .. })));
    }

    #[test]
    fn interpolation_reports_missing_and_unterminated_variables() {
        with_vars(&[("TEST_WELLORA_HOME", "/home/w")], || {
            assert_eq!(
                interpolate_env_vars("a=${TEST_WELLORA_HOME}/x, b=$HOME").expect("interpolate"),
                "a=/home/w/x, b=$HOME"
            );
            assert!(matches!(
                interpolate_env_vars("${TEST_WELLORA_UNSET_VAR}"),
                Err(ConfigError::MissingEnvInterpolation { ref var }) if var == "TEST_WELLORA_UNSET_VAR"
            ));
            assert!(matches!(
                interpolate_env_vars("url = \"${TEST_WELLORA_HOME\""),
                Err(ConfigError::UnterminatedInterpolation)
            ));
        });
    }

    #[test]
    fn env_beats_file_and_overrides_beat_env() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("wellora.toml");
        fs::write(
            &path,
            "[database]\nurl = \"sqlite://from-file.db\"\n\n[catalog]\nhair_path = \"file/hair.json\"\nskincare_path = \"file/skin.json\"\n",
        )
        .expect("write config");

        let vars = [
            ("WELLORA_DATABASE_URL", "sqlite://from-env.db"),
            ("WELLORA_CATALOG_HAIR_PATH", "env/hair.json"),
        ];
        let config = with_vars(&vars, || {
            AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
        })
        .expect("layered config");

        assert_eq!(config.database.url, "sqlite://from-override.db");
        assert_eq!(config.catalog.hair_path, PathBuf::from("env/hair.json"));
        assert_eq!(config.catalog.skincare_path, PathBuf::from("file/skin.json"));
    }

    #[test]
    fn catalog_override_replaces_every_path() {
        let catalog = CatalogConfig {
            menstrual_guide_path: PathBuf::from("fixtures/menstrual.json"),
            ..CatalogConfig::default()
        };
        let config = with_vars(&[("WELLORA_CATALOG_MENSTRUAL_GUIDE_PATH", "env/menstrual.json")], || {
            AppConfig::load(LoadOptions {
                overrides: ConfigOverrides { catalog: Some(catalog), ..ConfigOverrides::default() },
                ..LoadOptions::default()
            })
        })
        .expect("override config");

        assert_eq!(config.catalog.menstrual_guide_path, Path::new("fixtures/menstrual.json"));
    }

    #[test]
    fn primary_logging_variables_win_over_short_aliases() {
        let vars = [
            ("WELLORA_LOG_LEVEL", "warn"),
            ("WELLORA_LOGGING_LEVEL", "debug"),
            ("WELLORA_LOG_FORMAT", "pretty"),
        ];
        let config = with_vars(&vars, || AppConfig::load(LoadOptions::default())).expect("config");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn malformed_env_values_name_the_variable() {
        for (var, value) in [
            ("WELLORA_DATABASE_MAX_CONNECTIONS", "many"),
            ("WELLORA_SERVER_HEALTH_CHECK_PORT", "70000"),
            ("WELLORA_LOG_FORMAT", "xml"),
        ] {
            let result = with_vars(&[(var, value)], || AppConfig::load(LoadOptions::default()));
            assert!(
                matches!(result, Err(ConfigError::InvalidEnvOverride { ref key, .. }) if key == var),
                "{var}={value} should be rejected"
            );
        }
    }

    #[test]
    fn validation_names_the_offending_key() {
        for (var, value, key) in [
            ("WELLORA_DATABASE_TIMEOUT_SECS", "0", "database.timeout_secs"),
            ("WELLORA_DATABASE_URL", "postgres://db/wellora", "database.url"),
            ("WELLORA_LOGGING_LEVEL", "loud", "logging.level"),
        ] {
            let result = with_vars(&[(var, value)], || AppConfig::load(LoadOptions::default()));
            assert!(
                matches!(result, Err(ConfigError::Validation(ref message)) if message.contains(key)),
                "{var}={value} should fail validation on {key}"
            );
        }
    }

    #[test]
    fn required_file_must_exist() {
        let dir = TempDir::new().expect("tempdir");
        let missing = dir.path().join("absent.toml");
        let result = with_vars(&[], || {
            AppConfig::load(LoadOptions {
                config_path: Some(missing.clone()),
                require_file: true,
                ..LoadOptions::default()
            })
        });

        assert!(matches!(result, Err(ConfigError::MissingConfigFile(ref path)) if *path == missing));
    }

    #[test]
    fn settings_list_every_key_with_its_variable() {
        let config = AppConfig::default();
        let settings = config.settings();

        assert_eq!(settings.len(), 13);
        let hair = settings.iter().find(|setting| setting.key == "catalog.hair_path").expect("hair");
        assert_eq!(hair.env_var, "WELLORA_CATALOG_HAIR_PATH");
        assert_eq!(hair.value, "data/hair_catalog.json");
        assert!(settings.iter().any(|setting| setting.key == "logging.format" && setting.value == "compact"));
    }
}
