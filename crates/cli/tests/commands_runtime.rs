use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use procura_cli::commands::vendors::FilterArgs;
use procura_cli::commands::{analyze, compare, config, dashboard, globe, search, vendors};
use procura_core::config::{ConfigOverrides, LoadOptions};
use procura_core::domain::vendor::Source;
use serde_json::Value;

const QUERY: &str = "amoxicillin";

#[test]
fn search_matches_product_names_and_cas_numbers() {
    with_env(&[], || {
        let result = search::run(&LoadOptions::default(), "amox");
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "search");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"].as_array().map(Vec::len), Some(2));

        let by_cas = parse_payload(&search::run(&LoadOptions::default(), "103-90").output);
        assert_eq!(by_cas["data"][0]["name"], "Paracetamol API");
    });
}

#[test]
fn vendors_applies_filters_and_ranks_by_suitability() {
    with_env(&[], || {
        let filters = FilterArgs { sources: vec![Source::External], ..FilterArgs::default() };
        let result = vendors::run(&LoadOptions::default(), QUERY, filters);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let listed = payload["data"].as_array().cloned().unwrap_or_default();
        assert!(!listed.is_empty());
        assert!(listed.iter().all(|vendor| vendor["source"] == "EXT"));

        let scores = listed
            .iter()
            .filter_map(|vendor| vendor["suitabilityScore"].as_u64())
            .collect::<Vec<_>>();
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    });
}

#[test]
fn vendors_rejects_inverted_price_range() {
    with_env(&[], || {
        let filters = FilterArgs {
            min_price: Some("20".parse().expect("decimal")),
            max_price: Some("10".parse().expect("decimal")),
            ..FilterArgs::default()
        };
        let result = vendors::run(&LoadOptions::default(), QUERY, filters);
        assert_eq!(result.exit_code, 5);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_input");
    });
}

#[test]
fn analyze_recommends_switching_from_incumbent() {
    with_env(&[], || {
        let result = analyze::run(&LoadOptions::default(), QUERY, None);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["highlightVendorName"], "BioChem Solutions Ltd");
        assert_eq!(payload["data"]["incumbentVendorName"], "PharmaSource Global");
        assert_eq!(payload["data"]["quantity"], 500);
        assert_eq!(payload["data"]["savingsPercent"], 29);
    });
}

#[test]
fn analyze_uses_configured_default_quantity() {
    with_env(&[("PROCURA_ANALYSIS_DEFAULT_QUANTITY", "1000")], || {
        let payload = parse_payload(&analyze::run(&LoadOptions::default(), QUERY, Some(0)).output);
        assert_eq!(payload["data"]["quantity"], 1000);
    });
}

#[test]
fn compare_needs_two_resolvable_vendors() {
    with_env(&[], || {
        let ok = compare::run(&LoadOptions::default(), QUERY, &[2, 1], Some(100));
        assert_eq!(ok.exit_code, 0);
        let payload = parse_payload(&ok.output);
        assert_eq!(payload["data"]["basisQuantity"], 100);
        assert_eq!(payload["data"]["rows"].as_array().map(Vec::len), Some(2));
        assert_eq!(payload["data"]["rows"][0]["vendor"]["id"], 1);

        let too_few = compare::run(&LoadOptions::default(), QUERY, &[1, 999], None);
        assert_eq!(too_few.exit_code, 5);
        assert_eq!(parse_payload(&too_few.output)["error_class"], "invalid_input");
    });
}

#[test]
fn globe_offline_still_ranks_top_countries() {
    with_env(&[], || {
        let result = globe::run(&LoadOptions::default(), QUERY, true);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["shapes"].as_array().map(Vec::len), Some(0));
        assert_eq!(payload["data"]["topCountries"][0]["code"], "INDIA");
    });
}

#[test]
fn dashboard_reports_network_status() {
    with_env(&[], || {
        let payload = parse_payload(&dashboard::run(&LoadOptions::default()).output);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["networkStatus"]["activeVendors"], 142);
    });
}

#[test]
fn missing_feed_file_is_a_feed_failure() {
    with_env(&[("PROCURA_FEED_PATH", "/nonexistent/procura-feed.json")], || {
        let result = dashboard::run(&LoadOptions::default());
        assert_eq!(result.exit_code, 4);
        assert_eq!(parse_payload(&result.output)["error_class"], "feed");
    });
}

#[test]
fn invalid_env_is_a_config_failure() {
    with_env(&[("PROCURA_GEOGRAPHY_TIMEOUT_SECS", "soon")], || {
        let result = search::run(&LoadOptions::default(), QUERY);
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "search");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn config_reports_value_sources() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("procura.toml");
    fs::write(&path, "[geography]\ntimeout_secs = 5\n").expect("write config");

    with_env(&[("PROCURA_ANALYSIS_TOP_COUNTRIES", "3")], || {
        let options = LoadOptions {
            config_path: Some(path.clone()),
            require_file: true,
            overrides: ConfigOverrides {
                feed_path: Some(PathBuf::from("feed.json")),
                ..ConfigOverrides::default()
            },
        };
        let payload = parse_payload(&config::run(&options).output);
        assert_eq!(payload["status"], "ok");

        let entries = payload["data"]["entries"].as_array().cloned().unwrap_or_default();
        let source_of = |key: &str| {
            entries
                .iter()
                .find(|entry| entry["key"] == key)
                .and_then(|entry| entry["source"].as_str().map(str::to_string))
                .unwrap_or_default()
        };

        assert_eq!(source_of("feed.path"), "flag");
        assert_eq!(source_of("analysis.top_countries"), "env (PROCURA_ANALYSIS_TOP_COUNTRIES)");
        assert!(source_of("geography.timeout_secs").starts_with("file ("));
        assert_eq!(source_of("logging.level"), "default");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env<F>(vars: &[(&str, &str)], test: F)
where
    F: FnOnce(),
{
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let lock = ENV_LOCK.get_or_init(|| Mutex::new(()));
    let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let keys = [
        "PROCURA_FEED_PATH",
        "PROCURA_GEOGRAPHY_PRIMARY_URL",
        "PROCURA_GEOGRAPHY_FALLBACK_URL",
        "PROCURA_GEOGRAPHY_TIMEOUT_SECS",
        "PROCURA_GEOGRAPHY_ALIAS_TABLE_PATH",
        "PROCURA_ANALYSIS_DEFAULT_QUANTITY",
        "PROCURA_ANALYSIS_TOP_COUNTRIES",
        "PROCURA_LOGGING_LEVEL",
        "PROCURA_LOG_LEVEL",
        "PROCURA_LOGGING_FORMAT",
        "PROCURA_LOG_FORMAT",
    ];

    let previous =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect::<Vec<(&str, Option<String>)>>();

    for key in keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test();

    for (key, value) in previous {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }
}
