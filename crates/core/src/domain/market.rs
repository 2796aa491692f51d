use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::vendor::{Vendor, VendorId};
use crate::errors::DomainError;

pub const MAX_SUITABILITY_SCORE: u8 = 100;

/// The complete, unfiltered vendor collection for one product query.
///
/// Geographic aggregation and savings recommendations only accept a `Market`.
/// Filtering produces a [`Shortlist`](crate::pipeline::Shortlist), which borrows
/// from a market and cannot be turned back into one.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Market {
    vendors: Vec<Vendor>,
}

impl Market {
    pub fn new(vendors: Vec<Vendor>) -> Result<Self, DomainError> {
        let mut seen_ids: HashSet<VendorId> = HashSet::with_capacity(vendors.len());

        for vendor in &vendors {
            if !seen_ids.insert(vendor.id) {
                return Err(DomainError::DuplicateVendor(vendor.id));
            }
            if vendor.unit_price <= Decimal::ZERO {
                return Err(DomainError::InvariantViolation(format!(
                    "vendor {} ({}) has non-positive unit price {}",
                    vendor.id, vendor.name, vendor.unit_price
                )));
            }
            if vendor.suitability_score > MAX_SUITABILITY_SCORE {
                return Err(DomainError::InvariantViolation(format!(
                    "vendor {} ({}) has suitability score {} above {MAX_SUITABILITY_SCORE}",
                    vendor.id, vendor.name, vendor.suitability_score
                )));
            }
        }

        Ok(Self { vendors })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vendor> {
        self.vendors.iter()
    }

    pub fn find(&self, id: VendorId) -> Option<&Vendor> {
        self.vendors.iter().find(|vendor| vendor.id == id)
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

impl<'a> IntoIterator for &'a Market {
    type Item = &'a Vendor;
    type IntoIter = std::slice::Iter<'a, Vendor>;

    fn into_iter(self) -> Self::IntoIter {
        self.vendors.iter()
    }
}
