use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::vendor::{Source, Vendor};

use super::Shortlist;

/// Buyer-specified predicates. Empty or absent fields impose no constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub source: BTreeSet<Source>,
    pub min_suitability: Option<u8>,
    /// Matched when the vendor holds any one of these.
    pub certifications: BTreeSet<String>,
    /// Inclusive `(min, max)` bounds on unit price.
    pub price_range: Option<(Decimal, Decimal)>,
    pub current_partner_only: bool,
    /// Matched against the vendor's free-text region label.
    pub locations: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn is_unconstrained(&self) -> bool {
        self.source.is_empty()
            && self.min_suitability.is_none()
            && self.certifications.is_empty()
            && self.price_range.is_none()
            && !self.current_partner_only
            && self.locations.is_empty()
    }

    pub fn matches(&self, vendor: &Vendor) -> bool {
        if !self.source.is_empty() && !self.source.contains(&vendor.source) {
            return false;
        }

        if let Some(min_suitability) = self.min_suitability {
            if vendor.suitability_score < min_suitability {
                return false;
            }
        }

        if !self.certifications.is_empty()
            && !self.certifications.iter().any(|wanted| vendor.holds_certification(wanted))
        {
            return false;
        }

        if let Some((min, max)) = self.price_range {
            if vendor.unit_price < min || vendor.unit_price > max {
                return false;
            }
        }

        if self.current_partner_only && !vendor.is_current_partner {
            return false;
        }

        self.locations.is_empty() || self.locations.contains(&vendor.region)
    }
}

pub trait FilterEngine: Send + Sync {
    fn filter<'a>(&self, vendors: &'a [Vendor], criteria: &FilterCriteria) -> Shortlist<'a>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CriteriaFilterEngine;

impl FilterEngine for CriteriaFilterEngine {
    fn filter<'a>(&self, vendors: &'a [Vendor], criteria: &FilterCriteria) -> Shortlist<'a> {
        filter_vendors(vendors, criteria)
    }
}

pub fn filter_vendors<'a>(vendors: &'a [Vendor], criteria: &FilterCriteria) -> Shortlist<'a> {
    Shortlist::from_refs(vendors.iter().filter(|vendor| criteria.matches(vendor)).collect())
}
