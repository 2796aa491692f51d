use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PRIMARY_GEOGRAPHY_URL: &str =
    "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";
pub const DEFAULT_FALLBACK_GEOGRAPHY_URL: &str =
    "https://unpkg.com/world-atlas@2/countries-110m.json";

#[derive(Clone, Debug, Serialize)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub geography: GeographyConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct FeedConfig {
    /// JSON vendor feed. `None` serves the built-in demo dataset.
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GeographyConfig {
    pub primary_url: String,
    pub fallback_url: String,
    pub timeout_secs: u64,
    pub alias_table_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
pub struct AnalysisConfig {
    pub default_quantity: u32,
    pub top_countries: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub feed_path: Option<PathBuf>,
    pub alias_table_path: Option<PathBuf>,
    pub default_quantity: Option<u32>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
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

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            geography: GeographyConfig {
                primary_url: DEFAULT_PRIMARY_GEOGRAPHY_URL.to_string(),
                fallback_url: DEFAULT_FALLBACK_GEOGRAPHY_URL.to_string(),
                timeout_secs: 10,
                alias_table_path: None,
            },
            analysis: AnalysisConfig { default_quantity: 500, top_countries: 8 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
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

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("procura.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(feed) = patch.feed {
            if let Some(path) = feed.path {
                self.feed.path = Some(path);
            }
        }

        if let Some(geography) = patch.geography {
            if let Some(primary_url) = geography.primary_url {
                self.geography.primary_url = primary_url;
            }
            if let Some(fallback_url) = geography.fallback_url {
                self.geography.fallback_url = fallback_url;
            }
            if let Some(timeout_secs) = geography.timeout_secs {
                self.geography.timeout_secs = timeout_secs;
            }
            if let Some(alias_table_path) = geography.alias_table_path {
                self.geography.alias_table_path = Some(alias_table_path);
            }
        }

        if let Some(analysis) = patch.analysis {
            if let Some(default_quantity) = analysis.default_quantity {
                self.analysis.default_quantity = default_quantity;
            }
            if let Some(top_countries) = analysis.top_countries {
                self.analysis.top_countries = top_countries;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PROCURA_FEED_PATH") {
            self.feed.path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("PROCURA_GEOGRAPHY_PRIMARY_URL") {
            self.geography.primary_url = value;
        }
        if let Some(value) = read_env("PROCURA_GEOGRAPHY_FALLBACK_URL") {
            self.geography.fallback_url = value;
        }
        if let Some(value) = read_env("PROCURA_GEOGRAPHY_TIMEOUT_SECS") {
            self.geography.timeout_secs = parse_u64("PROCURA_GEOGRAPHY_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("PROCURA_GEOGRAPHY_ALIAS_TABLE_PATH") {
            self.geography.alias_table_path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("PROCURA_ANALYSIS_DEFAULT_QUANTITY") {
            self.analysis.default_quantity =
                parse_u32("PROCURA_ANALYSIS_DEFAULT_QUANTITY", &value)?;
        }
        if let Some(value) = read_env("PROCURA_ANALYSIS_TOP_COUNTRIES") {
            self.analysis.top_countries = parse_usize("PROCURA_ANALYSIS_TOP_COUNTRIES", &value)?;
        }

        let log_level =
            read_env("PROCURA_LOGGING_LEVEL").or_else(|| read_env("PROCURA_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PROCURA_LOGGING_FORMAT").or_else(|| read_env("PROCURA_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(feed_path) = overrides.feed_path {
            self.feed.path = Some(feed_path);
        }
        if let Some(alias_table_path) = overrides.alias_table_path {
            self.geography.alias_table_path = Some(alias_table_path);
        }
        if let Some(default_quantity) = overrides.default_quantity {
            self.analysis.default_quantity = default_quantity;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_feed(&self.feed)?;
        validate_geography(&self.geography)?;
        validate_analysis(&self.analysis)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("procura.toml"), PathBuf::from("config/procura.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_feed(feed: &FeedConfig) -> Result<(), ConfigError> {
    if feed.path.as_ref().is_some_and(|path| path.as_os_str().is_empty()) {
        return Err(ConfigError::Validation(
            "feed.path must not be empty (omit it to use the demo dataset)".to_string(),
        ));
    }

    Ok(())
}

fn validate_geography(geography: &GeographyConfig) -> Result<(), ConfigError> {
    let mirrors = [
        ("geography.primary_url", &geography.primary_url),
        ("geography.fallback_url", &geography.fallback_url),
    ];
    for (key, url) in mirrors {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "{key} must start with http:// or https://"
            )));
        }
    }

    if geography.timeout_secs == 0 || geography.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "geography.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_analysis(analysis: &AnalysisConfig) -> Result<(), ConfigError> {
    if analysis.default_quantity == 0 {
        return Err(ConfigError::Validation(
            "analysis.default_quantity must be greater than zero".to_string(),
        ));
    }

    if analysis.top_countries == 0 {
        return Err(ConfigError::Validation(
            "analysis.top_countries must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    feed: Option<FeedPatch>,
    geography: Option<GeographyPatch>,
    analysis: Option<AnalysisPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct FeedPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct GeographyPatch {
    primary_url: Option<String>,
    fallback_url: Option<String>,
    timeout_secs: Option<u64>,
    alias_table_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalysisPatch {
    default_quantity: Option<u32>,
    top_countries: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
