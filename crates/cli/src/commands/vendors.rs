use clap::Args;
use rust_decimal::Decimal;

use procura_core::config::LoadOptions;
use procura_core::domain::vendor::Source;
use procura_core::pipeline::filter::FilterCriteria;
use procura_feed::service::GeographyMode;

use super::{with_service, CommandResult, EXIT_INPUT};

#[derive(Clone, Debug, Default, Args)]
pub struct FilterArgs {
    #[arg(long = "source", value_name = "INT|EXT", help = "Keep vendors from this source")]
    pub sources: Vec<Source>,
    #[arg(long, value_name = "SCORE", help = "Minimum suitability score (0-100)")]
    pub min_suitability: Option<u8>,
    #[arg(long = "cert", value_name = "NAME", help = "Keep vendors holding any of these")]
    pub certifications: Vec<String>,
    #[arg(long, value_name = "USD")]
    pub min_price: Option<Decimal>,
    #[arg(long, value_name = "USD")]
    pub max_price: Option<Decimal>,
    #[arg(long)]
    pub current_partner_only: bool,
    #[arg(long = "location", value_name = "REGION")]
    pub locations: Vec<String>,
}

impl FilterArgs {
    pub fn into_criteria(self) -> Result<FilterCriteria, String> {
        let price_range = match (self.min_price, self.max_price) {
            (None, None) => None,
            (min, max) => {
                let min = min.unwrap_or(Decimal::ZERO);
                let max = max.unwrap_or(Decimal::MAX);
                if min > max {
                    return Err(format!("min price {min} is above max price {max}"));
                }
                Some((min, max))
            }
        };

        if self.min_suitability.is_some_and(|score| score > 100) {
            return Err("min suitability must be between 0 and 100".to_string());
        }

        Ok(FilterCriteria {
            source: self.sources.into_iter().collect(),
            min_suitability: self.min_suitability,
            certifications: self.certifications.into_iter().collect(),
            price_range,
            current_partner_only: self.current_partner_only,
            locations: self.locations.into_iter().collect(),
        })
    }
}

pub fn run(options: &LoadOptions, query: &str, filters: FilterArgs) -> CommandResult {
    let criteria = match filters.into_criteria() {
        Ok(criteria) => criteria,
        Err(message) => {
            return CommandResult::failure("vendors", "invalid_input", message, EXIT_INPUT);
        }
    };

    let query = query.to_string();
    with_service("vendors", options, GeographyMode::Disabled, |service| async move {
        service.get_vendors(&query, &criteria).await
    })
}
