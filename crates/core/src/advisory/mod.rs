//! Savings advice contrasting the incumbent vendor with the best-value alternative.
//!
//! The engine only accepts a [`Market`], never a filtered shortlist, so the advice
//! always reflects the whole market rather than the buyer's narrowed view.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::market::Market;
use crate::domain::vendor::Vendor;

/// Weeks assumed for the incumbent when its lead-time label has no leading number
/// or the number is zero.
pub const DEFAULT_INCUMBENT_LEAD_WEEKS: i64 = 2;
/// Weeks assumed for the best-value vendor when its lead-time label has no leading
/// number or the number is zero.
pub const DEFAULT_BEST_VALUE_LEAD_WEEKS: i64 = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub recommendation_text: String,
    pub highlight_vendor_name: String,
    pub incumbent_vendor_name: String,
    pub quantity: u32,
    pub savings_amount: Decimal,
    pub savings_percent: i64,
    /// Best-value lead time minus incumbent lead time, in weeks.
    pub lead_time_delta_weeks: i64,
}

pub trait RecommendationEngine: Send + Sync {
    fn recommend(&self, market: &Market, quantity: u32) -> Option<RecommendationResult>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SavingsRecommendationEngine;

impl RecommendationEngine for SavingsRecommendationEngine {
    fn recommend(&self, market: &Market, quantity: u32) -> Option<RecommendationResult> {
        recommend(market, quantity)
    }
}

/// The flagged best-value vendor, else the cheapest by unit price (first on ties).
pub fn best_value(market: &Market) -> Option<&Vendor> {
    market.iter().find(|vendor| vendor.is_best_value).or_else(|| {
        market
            .iter()
            .reduce(|best, vendor| if vendor.unit_price < best.unit_price { vendor } else { best })
    })
}

/// The current partner with the greatest lifetime spend (first on ties).
pub fn incumbent(market: &Market) -> Option<&Vendor> {
    market.iter().filter(|vendor| vendor.is_current_partner).reduce(|best, vendor| {
        if vendor.lifetime_spend() > best.lifetime_spend() {
            vendor
        } else {
            best
        }
    })
}

pub fn recommend(market: &Market, quantity: u32) -> Option<RecommendationResult> {
    let best = best_value(market)?;
    let current = incumbent(market)?;
    if quantity == 0 {
        return None;
    }

    let Some((savings, savings_percent)) = savings_at(current, best, quantity) else {
        tracing::warn!(
            event_name = "advisory.recommendation.overflow",
            incumbent = %current.name,
            best_value = %best.name,
            quantity,
            "savings arithmetic overflowed; no recommendation"
        );
        return None;
    };

    let current_weeks = quoted_weeks(current).unwrap_or(DEFAULT_INCUMBENT_LEAD_WEEKS);
    let best_value_weeks = quoted_weeks(best).unwrap_or(DEFAULT_BEST_VALUE_LEAD_WEEKS);
    let lead_time_delta_weeks = best_value_weeks.saturating_sub(current_weeks);

    let recommendation_text = format!(
        "Based on current input-cost assumptions, switching to {} could yield a {}% savings (approx. ${}){}.",
        best.name,
        savings_percent,
        format_grouped(savings),
        lead_time_note(lead_time_delta_weeks)
    );

    tracing::debug!(
        event_name = "advisory.recommendation.computed",
        incumbent = %current.name,
        best_value = %best.name,
        quantity,
        savings = %savings,
        savings_percent,
        lead_time_delta_weeks,
        "savings recommendation computed"
    );

    Some(RecommendationResult {
        recommendation_text,
        highlight_vendor_name: best.name.clone(),
        incumbent_vendor_name: current.name.clone(),
        quantity,
        savings_amount: savings,
        savings_percent,
        lead_time_delta_weeks,
    })
}

// "0 Weeks" counts as unquoted
fn quoted_weeks(vendor: &Vendor) -> Option<i64> {
    vendor.lead_time_weeks().filter(|weeks| *weeks != 0)
}

/// Savings amount and whole percent at `quantity`, or `None` when the decimal
/// arithmetic overflows.
fn savings_at(current: &Vendor, best: &Vendor, quantity: u32) -> Option<(Decimal, i64)> {
    let basis = Decimal::from(quantity);
    let current_cost = current.unit_price.checked_mul(basis)?;
    let best_value_cost = best.unit_price.checked_mul(basis)?;
    let savings = current_cost.checked_sub(best_value_cost)?;
    let percent = savings.checked_div(current_cost)?.checked_mul(Decimal::ONE_HUNDRED)?;
    Some((savings, round_half_up(percent)?))
}

fn lead_time_note(delta_weeks: i64) -> String {
    let weeks = delta_weeks.unsigned_abs();
    let plural = if weeks > 1 { "s" } else { "" };
    match delta_weeks.signum() {
        1 => format!(", though lead time increases by {weeks} week{plural}"),
        -1 => format!(", with lead time {weeks} week{plural} faster"),
        _ => String::new(),
    }
}

// half-way values round toward positive infinity
fn round_half_up(value: Decimal) -> Option<i64> {
    value.checked_add(Decimal::new(5, 1))?.floor().to_i64()
}

/// Thousands-grouped amount with at most three fraction digits, e.g. `2,150` or `1,234.5`.
pub fn format_grouped(amount: Decimal) -> String {
    let rounded = amount.round_dp(3).normalize();
    let text = rounded.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 4);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{best_value, format_grouped, incumbent, recommend, round_half_up};
    use crate::domain::fixtures::{partner, priced, vendor};
    use crate::domain::market::Market;
    use crate::domain::vendor::Vendor;

    fn flagged_best_value(id: u32, name: &str, unit_price: Decimal) -> Vendor {
        Vendor { is_best_value: true, lead_time: "4 Weeks".to_string(), ..priced(id, name, unit_price) }
    }

    #[test]
    fn savings_against_flagged_best_value() {
        let market = Market::new(vec![
            partner(4, "Canada Health Imports", Decimal::new(1_280, 2), 210_000),
            flagged_best_value(2, "BioChem Solutions Ltd", Decimal::new(850, 2)),
        ])
        .expect("valid market");

        let result = recommend(&market, 500).expect("recommendation");

        assert_eq!(result.savings_amount, Decimal::new(2_150, 0));
        assert_eq!(result.savings_percent, 34);
        assert_eq!(result.lead_time_delta_weeks, 2);
        assert_eq!(result.highlight_vendor_name, "BioChem Solutions Ltd");
        assert_eq!(result.incumbent_vendor_name, "Canada Health Imports");
        assert_eq!(
            result.recommendation_text,
            "Based on current input-cost assumptions, switching to BioChem Solutions Ltd could yield a 34% savings (approx. $2,150), though lead time increases by 2 weeks."
        );
    }

    #[test]
    fn flag_overrides_cheaper_unflagged_vendor() {
        let market = Market::new(vec![
            priced(1, "Mumbai Chemicals Ltd", Decimal::new(680, 2)),
            flagged_best_value(2, "BioChem Solutions Ltd", Decimal::new(850, 2)),
        ])
        .expect("valid market");

        assert_eq!(best_value(&market).map(|vendor| vendor.id.0), Some(2));
    }

    #[test]
    fn best_value_falls_back_to_first_cheapest() {
        let market = Market::new(vec![
            priced(1, "A", Decimal::new(950, 2)),
            priced(2, "B", Decimal::new(750, 2)),
            priced(3, "C", Decimal::new(750, 2)),
        ])
        .expect("valid market");

        assert_eq!(best_value(&market).map(|vendor| vendor.id.0), Some(2));
    }

    #[test]
    fn incumbent_is_partner_with_largest_lifetime_spend() {
        let market = Market::new(vec![
            partner(1, "PharmaSource Global", Decimal::new(12, 0), 1_200_000),
            partner(4, "Canada Health Imports", Decimal::new(1_280, 2), 210_000),
            partner(5, "Reliable Compounds", Decimal::new(14, 0), 350_000),
        ])
        .expect("valid market");

        assert_eq!(incumbent(&market).map(|vendor| vendor.id.0), Some(1));
    }

    #[test]
    fn partner_without_history_counts_as_zero_spend() {
        let mut newcomer = partner(1, "Newcomer", Decimal::TEN, 0);
        newcomer.internal_history = None;
        let market = Market::new(vec![newcomer, partner(2, "Tenured", Decimal::TEN, 0)])
            .expect("valid market");

        // equal spend keeps the first partner
        assert_eq!(incumbent(&market).map(|vendor| vendor.id.0), Some(1));
    }

    #[test]
    fn no_current_partner_means_no_recommendation() {
        let market = Market::new(vec![
            vendor(1, "A"),
            flagged_best_value(2, "B", Decimal::new(850, 2)),
        ])
        .expect("valid market");

        assert!(recommend(&market, 500).is_none());
        assert!(recommend(&Market::empty(), 500).is_none());
    }

    #[test]
    fn zero_quantity_yields_no_recommendation() {
        let market = Market::new(vec![partner(1, "A", Decimal::TEN, 10)]).expect("valid market");
        assert!(recommend(&market, 0).is_none());
    }

    #[test]
    fn faster_alternative_gets_faster_note() {
        let mut slow_partner = partner(1, "Slow Partner", Decimal::new(14, 0), 100);
        slow_partner.lead_time = "5 Weeks".to_string();
        let mut quick = flagged_best_value(2, "Quick", Decimal::new(9, 0));
        quick.lead_time = "4 Weeks".to_string();
        let market = Market::new(vec![slow_partner, quick]).expect("valid market");

        let result = recommend(&market, 100).expect("recommendation");
        assert_eq!(result.lead_time_delta_weeks, -1);
        assert!(result.recommendation_text.ends_with(", with lead time 1 week faster."));
    }

    #[test]
    fn equal_lead_time_adds_no_note() {
        let mut current = partner(1, "Current", Decimal::new(12, 0), 100);
        current.lead_time = "3 Weeks".to_string();
        let mut cheap = flagged_best_value(2, "Cheap", Decimal::new(6, 0));
        cheap.lead_time = "3 weeks".to_string();
        let market = Market::new(vec![current, cheap]).expect("valid market");

        let result = recommend(&market, 10).expect("recommendation");
        assert_eq!(result.lead_time_delta_weeks, 0);
        assert_eq!(result.savings_percent, 50);
        assert!(result.recommendation_text.ends_with("(approx. $60)."));
    }

    #[test]
    fn unparseable_lead_times_use_default_weeks() {
        let mut current = partner(1, "Current", Decimal::new(12, 0), 100);
        current.lead_time = "TBD".to_string();
        let mut cheap = flagged_best_value(2, "Cheap", Decimal::new(6, 0));
        cheap.lead_time = "on request".to_string();
        let market = Market::new(vec![current, cheap]).expect("valid market");

        assert_eq!(recommend(&market, 10).map(|result| result.lead_time_delta_weeks), Some(2));
    }

    #[test]
    fn overflowing_costs_yield_no_recommendation() {
        let market = Market::new(vec![
            partner(1, "Premium Partner", Decimal::MAX / Decimal::ONE_HUNDRED, 10),
            priced(2, "Budget", Decimal::ONE),
        ])
        .expect("valid market");

        assert!(recommend(&market, 500).is_none());
        assert!(recommend(&market, 1).is_some());
    }

    #[test]
    fn zero_week_lead_times_use_default_weeks() {
        let mut current = partner(1, "Current", Decimal::new(12, 0), 100);
        current.lead_time = "0 Weeks".to_string();
        let mut cheap = flagged_best_value(2, "Cheap", Decimal::new(6, 0));
        cheap.lead_time = "0 weeks".to_string();
        let market = Market::new(vec![current, cheap]).expect("valid market");

        let result = recommend(&market, 10).expect("recommendation");
        assert_eq!(result.lead_time_delta_weeks, 2);
        assert!(result.recommendation_text.ends_with("increases by 2 weeks."));
    }

    #[test]
    fn incumbent_that_is_already_best_value_saves_nothing() {
        let market = Market::new(vec![partner(1, "Only", Decimal::new(850, 2), 100)])
            .expect("valid market");

        let result = recommend(&market, 500).expect("recommendation");
        assert_eq!(result.savings_amount, Decimal::ZERO);
        assert_eq!(result.savings_percent, 0);
    }

    #[test]
    fn rounding_matches_half_up_semantics() {
        assert_eq!(round_half_up(Decimal::new(335, 1)), Some(34));
        assert_eq!(round_half_up(Decimal::new(334, 1)), Some(33));
        assert_eq!(round_half_up(Decimal::new(-25, 1)), Some(-2));
        assert_eq!(round_half_up(Decimal::MAX), None);
    }

    #[test]
    fn grouped_formatting() {
        assert_eq!(format_grouped(Decimal::new(2_150, 0)), "2,150");
        assert_eq!(format_grouped(Decimal::new(2_150_00, 2)), "2,150");
        assert_eq!(format_grouped(Decimal::new(1_234_567_5, 1)), "1,234,567.5");
        assert_eq!(format_grouped(Decimal::new(-1_000, 0)), "-1,000");
        assert_eq!(format_grouped(Decimal::new(999, 0)), "999");
        assert_eq!(format_grouped(Decimal::new(12_345_678, 4)), "1,234.568");
    }
}
