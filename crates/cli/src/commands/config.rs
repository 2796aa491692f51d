use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use procura_core::config::LoadOptions;
use serde::Serialize;
use toml::Value;

use super::{load_config, CommandResult};

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: String,
    pub source: String,
}

#[derive(Debug, Serialize)]
struct ConfigReport {
    precedence: &'static str,
    config_file: Option<String>,
    entries: Vec<ConfigEntry>,
}

/// Effective configuration with the layer each value came from.
pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match load_config("config", options) {
        Ok(config) => config,
        Err(result) => return result,
    };

    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let overrides = &options.overrides;
    let source = |key_path: &str, env_keys: &[&str], overridden: bool| {
        if overridden {
            return "flag".to_string();
        }
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let display_path = |path: Option<&PathBuf>| {
        path.map(|path| path.display().to_string()).unwrap_or_else(|| "<unset>".to_string())
    };

    let entries = vec![
        ConfigEntry {
            key: "feed.path",
            value: config
                .feed
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<demo dataset>".to_string()),
            source: source("feed.path", &["PROCURA_FEED_PATH"], overrides.feed_path.is_some()),
        },
        ConfigEntry {
            key: "geography.primary_url",
            value: config.geography.primary_url.clone(),
            source: source("geography.primary_url", &["PROCURA_GEOGRAPHY_PRIMARY_URL"], false),
        },
        ConfigEntry {
            key: "geography.fallback_url",
            value: config.geography.fallback_url.clone(),
            source: source("geography.fallback_url", &["PROCURA_GEOGRAPHY_FALLBACK_URL"], false),
        },
        ConfigEntry {
            key: "geography.timeout_secs",
            value: config.geography.timeout_secs.to_string(),
            source: source("geography.timeout_secs", &["PROCURA_GEOGRAPHY_TIMEOUT_SECS"], false),
        },
        ConfigEntry {
            key: "geography.alias_table_path",
            value: display_path(config.geography.alias_table_path.as_ref()),
            source: source(
                "geography.alias_table_path",
                &["PROCURA_GEOGRAPHY_ALIAS_TABLE_PATH"],
                overrides.alias_table_path.is_some(),
            ),
        },
        ConfigEntry {
            key: "analysis.default_quantity",
            value: config.analysis.default_quantity.to_string(),
            source: source(
                "analysis.default_quantity",
                &["PROCURA_ANALYSIS_DEFAULT_QUANTITY"],
                overrides.default_quantity.is_some(),
            ),
        },
        ConfigEntry {
            key: "analysis.top_countries",
            value: config.analysis.top_countries.to_string(),
            source: source("analysis.top_countries", &["PROCURA_ANALYSIS_TOP_COUNTRIES"], false),
        },
        ConfigEntry {
            key: "logging.level",
            value: config.logging.level.clone(),
            source: source(
                "logging.level",
                &["PROCURA_LOGGING_LEVEL", "PROCURA_LOG_LEVEL"],
                overrides.log_level.is_some(),
            ),
        },
        ConfigEntry {
            key: "logging.format",
            value: format!("{:?}", config.logging.format).to_ascii_lowercase(),
            source: source(
                "logging.format",
                &["PROCURA_LOGGING_FORMAT", "PROCURA_LOG_FORMAT"],
                overrides.log_format.is_some(),
            ),
        },
    ];

    CommandResult::success(
        "config",
        &ConfigReport {
            precedence: "flag > env > file > default",
            config_file: config_file_path.map(|path| path.display().to_string()),
            entries,
        },
    )
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then(|| path.to_path_buf());
    }

    ["procura.toml", "config/procura.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
