use procura_core::config::LoadOptions;
use procura_core::domain::vendor::VendorId;
use procura_feed::service::GeographyMode;

use super::{with_service, CommandResult};

pub fn run(
    options: &LoadOptions,
    query: &str,
    vendor_ids: &[u32],
    quantity: Option<u32>,
) -> CommandResult {
    let query = query.to_string();
    let vendor_ids = vendor_ids.iter().copied().map(VendorId).collect::<Vec<_>>();
    with_service("compare", options, GeographyMode::Disabled, |service| async move {
        service.compare(&query, &vendor_ids, quantity).await
    })
}
