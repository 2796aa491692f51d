use procura_core::config::LoadOptions;
use procura_feed::service::{CostInputs, GeographyMode};

use super::{with_service, CommandResult};

/// Prints the recommendation, or `null` when the market has no cheaper
/// alternative to the incumbent.
pub fn run(options: &LoadOptions, query: &str, quantity: Option<u32>) -> CommandResult {
    let query = query.to_string();
    with_service("analyze", options, GeographyMode::Disabled, |service| async move {
        service.get_ai_analysis(&query, CostInputs { quantity }).await
    })
}
