use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::domain::market::Market;
use crate::domain::vendor::{Vendor, VendorId};

pub const MIN_COMPARED_VENDORS: usize = 2;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    #[error("select at least {MIN_COMPARED_VENDORS} vendors to compare (found {found} of {requested} requested)")]
    NotEnoughVendors { requested: usize, found: usize },
    #[error("basis quantity must be greater than zero")]
    ZeroQuantity,
    #[error("estimated cost for vendor {vendor} overflows at basis quantity {basis_quantity}")]
    Overflow { vendor: VendorId, basis_quantity: u32 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub vendor: Vendor,
    /// `unit_price * basis_quantity`
    pub total_est_cost: Decimal,
    pub is_lowest_cost: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub basis_quantity: u32,
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    pub fn lowest_cost(&self) -> Option<&ComparisonRow> {
        self.rows.iter().find(|row| row.is_lowest_cost)
    }

    pub fn incumbents(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|row| row.vendor.is_current_partner)
    }
}

/// Side-by-side view of the selected vendors at a common basis quantity.
///
/// Rows follow market order, not selection order. Unknown ids are ignored; the
/// comparison needs at least two resolvable vendors.
pub fn compare(
    market: &Market,
    vendor_ids: &[VendorId],
    basis_quantity: u32,
) -> Result<Comparison, CompareError> {
    if basis_quantity == 0 {
        return Err(CompareError::ZeroQuantity);
    }

    let selected =
        market.iter().filter(|vendor| vendor_ids.contains(&vendor.id)).collect::<Vec<_>>();
    if selected.len() < MIN_COMPARED_VENDORS {
        return Err(CompareError::NotEnoughVendors {
            requested: vendor_ids.len(),
            found: selected.len(),
        });
    }

    let quantity = Decimal::from(basis_quantity);
    let lowest_id = selected
        .iter()
        .copied()
        .reduce(|best, vendor| if vendor.unit_price < best.unit_price { vendor } else { best })
        .map(|vendor| vendor.id);

    let rows = selected
        .into_iter()
        .map(|vendor| {
            let total_est_cost = vendor
                .unit_price
                .checked_mul(quantity)
                .ok_or(CompareError::Overflow { vendor: vendor.id, basis_quantity })?;
            Ok(ComparisonRow {
                vendor: vendor.clone(),
                total_est_cost,
                is_lowest_cost: Some(vendor.id) == lowest_id,
            })
        })
        .collect::<Result<Vec<_>, CompareError>>()?;

    Ok(Comparison { basis_quantity, rows })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{compare, CompareError};
    use crate::domain::fixtures::{partner, priced};
    use crate::domain::market::Market;
    use crate::domain::vendor::VendorId;

    fn market() -> Market {
        Market::new(vec![
            partner(1, "Canada Health Imports", Decimal::new(1_280, 2), 210_000),
            priced(2, "BioChem Solutions Ltd", Decimal::new(850, 2)),
            priced(3, "Generic API Makers Inc.", Decimal::new(950, 2)),
        ])
        .expect("valid market")
    }

    #[test]
    fn computes_total_cost_at_basis_quantity() {
        let comparison =
            compare(&market(), &[VendorId(2), VendorId(1)], 500).expect("two vendors compare");

        let totals = comparison
            .rows
            .iter()
            .map(|row| (row.vendor.id.0, row.total_est_cost))
            .collect::<Vec<_>>();
        assert_eq!(totals, vec![(1, Decimal::new(6_400, 0)), (2, Decimal::new(4_250, 0))]);
        assert_eq!(comparison.lowest_cost().map(|row| row.vendor.id), Some(VendorId(2)));
        assert_eq!(comparison.incumbents().count(), 1);
    }

    #[test]
    fn needs_two_known_vendors() {
        let error = compare(&market(), &[VendorId(2), VendorId(99)], 500)
            .expect_err("one known vendor is not enough");

        assert_eq!(error, CompareError::NotEnoughVendors { requested: 2, found: 1 });
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let market = Market::new(vec![
            partner(1, "Premium Partner", Decimal::MAX / Decimal::ONE_HUNDRED, 10),
            priced(2, "Budget", Decimal::ONE),
        ])
        .expect("valid market");

        assert_eq!(
            compare(&market, &[VendorId(1), VendorId(2)], 500),
            Err(CompareError::Overflow { vendor: VendorId(1), basis_quantity: 500 })
        );
    }

    #[test]
    fn rejects_zero_basis_quantity() {
        assert_eq!(
            compare(&market(), &[VendorId(1), VendorId(2)], 0),
            Err(CompareError::ZeroQuantity)
        );
    }
}
