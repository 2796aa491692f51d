use procura_core::config::LoadOptions;
use procura_feed::service::GeographyMode;

use super::{with_service, CommandResult};

pub fn run(options: &LoadOptions, query: &str) -> CommandResult {
    let query = query.to_string();
    with_service("search", options, GeographyMode::Disabled, |service| async move {
        service.search_products(&query).await
    })
}
