use procura_core::config::LoadOptions;
use procura_feed::service::GeographyMode;

use super::{with_service, CommandResult};

pub fn run(options: &LoadOptions, query: &str, offline: bool) -> CommandResult {
    let mode = if offline { GeographyMode::Disabled } else { GeographyMode::Remote };
    let query = query.to_string();
    with_service("globe", options, mode, |service| async move { service.geo_view(&query).await })
}
