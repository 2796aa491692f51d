use procura_core::config::LoadOptions;
use procura_feed::service::GeographyMode;

use super::{with_service, CommandResult};

pub fn run(options: &LoadOptions) -> CommandResult {
    with_service("dashboard", options, GeographyMode::Disabled, |service| async move {
        service.get_dashboard().await
    })
}
