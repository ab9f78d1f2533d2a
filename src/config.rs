use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "PROMPTITECTURE_CONFIG";

/// Config file used when neither `--config` nor `PROMPTITECTURE_CONFIG` is given
pub const DEFAULT_CONFIG_FILE: &str = "promptitecture.toml";

const HOST_ENV: &str = "PROMPTITECTURE_HOST";
const PORT_ENV: &str = "PROMPTITECTURE_PORT";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub promptitecture: CoreConfig,
    #[serde(default)]
    pub http_server: HttpServerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(skip)]
    pub source: ConfigSource,
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file was found; built-in defaults
    #[default]
    Defaults,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Defaults => write!(f, "built-in defaults (no {} found)", DEFAULT_CONFIG_FILE),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// General settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CoreConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
            allowed_origins: Vec::new(),
        }
    }
}

/// LLM provider credentials, referenced by environment variable name only
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_openai_api_key_env")]
    pub openai_api_key_env: String,
    #[serde(default = "default_anthropic_api_key_env")]
    pub anthropic_api_key_env: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            openai_api_key_env: default_openai_api_key_env(),
            anthropic_api_key_env: default_anthropic_api_key_env(),
        }
    }
}

/// Whether a provider's API key is present in the environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub provider: &'static str,
    pub api_key_env: String,
    pub configured: bool,
}

impl ProvidersConfig {
    /// Report key presence for each provider without exposing key values
    pub fn status(&self) -> Vec<ProviderStatus> {
        [
            ("openai", &self.openai_api_key_env),
            ("anthropic", &self.anthropic_api_key_env),
        ]
        .into_iter()
        .map(|(provider, env)| ProviderStatus {
            provider,
            api_key_env: env.clone(),
            configured: std::env::var(env).map(|v| !v.trim().is_empty()).unwrap_or(false),
        })
        .collect()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_anthropic_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

/// Serialization format of a config file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Toml,
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. `explicit`, usually the CLI's `--config`
    /// 2. Path specified in PROMPTITECTURE_CONFIG environment variable
    /// 3. ./promptitecture.toml in current directory
    ///
    /// A missing file is an error for 1 and 2; for 3 the defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let _ = dotenv::dotenv();

        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

        let mut config = match named {
            Some(path) => Self::from_file(&path)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Config::default()
                }
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Read and parse a single config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::parse(&content, ConfigFormat::from_path(path))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.source = ConfigSource::File(path.to_path_buf());
        Ok(config)
    }

    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config: Config = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            // An empty YAML document deserializes to unit, not to an empty map
            ConfigFormat::Yaml if content.trim().is_empty() => Config::default(),
            ConfigFormat::Yaml => serde_yaml_ng::from_str(content)?,
        };
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var(HOST_ENV) {
            self.http_server.host = host;
        }

        if let Ok(port) = std::env::var(PORT_ENV) {
            self.http_server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{} must be a port number, got {:?}", PORT_ENV, port))?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.http_server.host.trim().is_empty() {
            anyhow::bail!("http_server.host must not be empty");
        }

        if self.http_server.port == 0 {
            anyhow::bail!("http_server.port must be greater than 0");
        }

        let level = self.promptitecture.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            anyhow::bail!(
                "promptitecture.log_level must be one of {}, got {:?}",
                LOG_LEVELS.join("|"),
                self.promptitecture.log_level
            );
        }

        for origin in &self.http_server.allowed_origins {
            if axum::http::HeaderValue::from_str(origin).is_err() {
                anyhow::bail!("http_server.allowed_origins contains an invalid origin: {:?}", origin);
            }
        }

        Ok(())
    }

    /// `host:port` the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_server.host, self.http_server.port)
    }

    /// Base URL clients use to reach the configured server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.bind_addr())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize tests that mutate process-wide env so they don't race.
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 3] = [CONFIG_ENV, HOST_ENV, PORT_ENV];

    /// Clears the config env vars for the duration of a test and restores them on drop.
    struct EnvGuard(Vec<(&'static str, Option<String>)>);

    impl EnvGuard {
        fn clean() -> Self {
            let saved = ENV_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect();
            for name in ENV_VARS {
                std::env::remove_var(name);
            }
            Self(saved)
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (name, value) in &self.0 {
                match value {
                    Some(v) => std::env::set_var(name, v),
                    None => std::env::remove_var(name),
                }
            }
        }
    }

    /// Restores cwd when dropped (e.g. on panic).
    struct CwdGuard(PathBuf);

    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.0);
        }
    }

    fn lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.promptitecture.log_level, "info");
        assert_eq!(config.http_server.host, "127.0.0.1");
        assert_eq!(config.http_server.port, 8000);
        assert!(config.http_server.allowed_origins.is_empty());
        assert_eq!(config.providers.openai_api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.providers.anthropic_api_key_env, "ANTHROPIC_API_KEY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_fills_defaults() {
        let config = Config::parse(
            r#"
[http_server]
port = 9100
"#,
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(config.http_server.port, 9100);
        assert_eq!(config.http_server.host, "127.0.0.1");
        assert_eq!(config.promptitecture.log_level, "info");
    }

    #[test]
    fn test_parse_yaml() {
        let config = Config::parse(
            "promptitecture:\n  log_level: debug\nhttp_server:\n  host: 0.0.0.0\n  allowed_origins:\n    - https://app.example.com\n",
            ConfigFormat::Yaml,
        )
        .unwrap();
        assert_eq!(config.promptitecture.log_level, "debug");
        assert_eq!(config.http_server.host, "0.0.0.0");
        assert_eq!(config.http_server.port, 8000);
        assert_eq!(config.http_server.allowed_origins, vec!["https://app.example.com"]);
    }

    #[test]
    fn test_parse_empty_yaml_is_default() {
        let config = Config::parse("  \n", ConfigFormat::Yaml).unwrap();
        assert_eq!(config.http_server.port, 8000);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.YML")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Toml);
    }

    #[test]
    fn test_load_explicit_file() {
        let _lock = lock();
        let _env = EnvGuard::clean();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        fs::write(&path, "[promptitecture]\nlog_level = \"debug\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.promptitecture.log_level, "debug");
        assert_eq!(config.source, ConfigSource::File(path.clone()));
        assert_eq!(config.source.to_string(), path.display().to_string());
    }

    #[test]
    fn test_load_without_any_file_reports_defaults() {
        let _lock = lock();
        let _env = EnvGuard::clean();
        let temp_dir = TempDir::new().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        let _cwd = CwdGuard(original_dir);
        std::env::set_current_dir(temp_dir.path()).unwrap();

        let config = Config::load(None).unwrap();
        assert_eq!(config.source, ConfigSource::Defaults);
        assert!(config.source.to_string().contains(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_load_from_env_var() {
        let _lock = lock();
        let _env = EnvGuard::clean();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("from-env.yml");
        fs::write(&path, "http_server:\n  port: 7001\n").unwrap();
        std::env::set_var(CONFIG_ENV, &path);

        let config = Config::load(None).unwrap();
        assert_eq!(config.http_server.port, 7001);
        assert_eq!(config.source, ConfigSource::File(path.clone()));
    }

    #[test]
    fn test_load_missing_explicit_file_is_error() {
        let _lock = lock();
        let _env = EnvGuard::clean();
        let err = Config::load(Some(Path::new("/nonexistent/promptitecture.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_invalid_toml_is_error() {
        let _lock = lock();
        let _env = EnvGuard::clean();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "[http_server\nport = ").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_env_overrides_host_and_port() {
        let _lock = lock();
        let _env = EnvGuard::clean();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("base.toml");
        fs::write(&path, "[http_server]\nport = 9000\n").unwrap();
        std::env::set_var(HOST_ENV, "0.0.0.0");
        std::env::set_var(PORT_ENV, "9443");

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.http_server.host, "0.0.0.0");
        assert_eq!(config.http_server.port, 9443);
    }

    #[test]
    fn test_env_override_bad_port() {
        let _lock = lock();
        let _env = EnvGuard::clean();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("base.toml");
        fs::write(&path, "").unwrap();
        std::env::set_var(PORT_ENV, "eighty");

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains(PORT_ENV));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.http_server.port = 0;
        assert!(config.validate().unwrap_err().to_string().contains("port"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.promptitecture.log_level = "verbose".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("log_level"));
    }

    #[test]
    fn test_validate_accepts_uppercase_log_level() {
        let mut config = Config::default();
        config.promptitecture.log_level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_origin() {
        let mut config = Config::default();
        config.http_server.allowed_origins = vec!["https://ok.example.com".into(), "bad\norigin".into()];
        assert!(config.validate().unwrap_err().to_string().contains("allowed_origins"));
    }

    #[test]
    fn test_provider_status_reports_presence_only() {
        let _lock = lock();
        let providers = ProvidersConfig {
            openai_api_key_env: "PT_TEST_OPENAI_KEY".to_string(),
            anthropic_api_key_env: "PT_TEST_ANTHROPIC_KEY".to_string(),
        };
        std::env::set_var("PT_TEST_OPENAI_KEY", "sk-test");
        std::env::remove_var("PT_TEST_ANTHROPIC_KEY");

        let status = providers.status();
        std::env::remove_var("PT_TEST_OPENAI_KEY");

        assert_eq!(status.len(), 2);
        assert_eq!(status[0].provider, "openai");
        assert!(status[0].configured);
        assert_eq!(status[1].provider, "anthropic");
        assert!(!status[1].configured);
        let json = serde_json::to_string(&status).unwrap();
        assert!(!json.contains("sk-test"));
    }

    #[test]
    fn test_addresses_and_toml_output() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.base_url(), "http://127.0.0.1:8000");

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[http_server]"));
        let reparsed = Config::parse(&rendered, ConfigFormat::Toml).unwrap();
        assert_eq!(reparsed.http_server.port, 8000);
    }
}
