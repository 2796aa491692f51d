use rust_decimal::Decimal;

use crate::domain::vendor::{InternalHistory, Source, Vendor, VendorId};

pub(crate) fn vendor(id: u32, name: &str) -> Vendor {
    Vendor {
        id: VendorId(id),
        name: name.to_string(),
        source: Source::External,
        is_current_partner: false,
        is_preferred: false,
        is_best_value: false,
        is_fastest: false,
        unit_price: Decimal::new(1_000, 2),
        total_est_cost: Decimal::new(5_000, 0),
        available_qty: 10_000,
        total_spend: None,
        region: "India".to_string(),
        country: None,
        lat: None,
        lng: None,
        lead_time: "2 Weeks".to_string(),
        shelf_life: "24 Months".to_string(),
        packaging: "Standard Box (50/pack)".to_string(),
        storage: "RT (2 - 25 deg C)".to_string(),
        locking: "Standard".to_string(),
        suitability_score: 80,
        certifications: vec!["GMP".to_string()],
        internal_history: None,
        risk_assessment: None,
        website: None,
    }
}

pub(crate) fn priced(id: u32, name: &str, unit_price: Decimal) -> Vendor {
    Vendor { unit_price, ..vendor(id, name) }
}

pub(crate) fn partner(id: u32, name: &str, unit_price: Decimal, lifetime_spend: i64) -> Vendor {
    Vendor {
        source: Source::Internal,
        is_current_partner: true,
        internal_history: Some(InternalHistory {
            partner_since: 2020,
            lifetime_spend: Decimal::from(lifetime_spend),
        }),
        ..priced(id, name, unit_price)
    }
}

pub(crate) fn in_country(id: u32, country: &str, total_spend: i64) -> Vendor {
    Vendor {
        country: Some(country.to_string()),
        total_spend: Some(Decimal::from(total_spend)),
        ..vendor(id, &format!("{country} vendor {id}"))
    }
}
