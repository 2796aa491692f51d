//! Built-in demo dataset: twelve vendors for one API sourcing exercise, the
//! product catalog and the landing-page snapshot.

use rust_decimal::Decimal;

use procura_core::domain::dashboard::{DashboardStats, NetworkStatus, RiskAlert};
use procura_core::domain::product::{Product, ProductId};
use procura_core::domain::vendor::{
    InternalHistory, RiskAssessment, RiskLevel, Source, VendorId,
};

use crate::document::{FeedDocument, VendorRecord};

pub const DEMO_VENDOR_COUNT: usize = 12;

pub fn demo_document() -> FeedDocument {
    FeedDocument {
        products: demo_products(),
        vendors: demo_vendors(),
        dashboard: demo_dashboard(),
        queries: Default::default(),
    }
}

pub fn demo_products() -> Vec<Product> {
    [
        (1, "TSA Plates", "N/A", "Lab Consumables"),
        (2, "Amoxicillin API", "26787-78-0", "Antibiotics"),
        (3, "Amoxicillin Trihydrate", "61336-70-7", "Antibiotics"),
        (4, "Paracetamol API", "103-90-2", "Analgesics"),
        (5, "Ibuprofen API", "15687-27-1", "NSAIDs"),
    ]
    .into_iter()
    .map(|(id, name, cas_number, category)| Product {
        id: ProductId(id),
        name: name.to_string(),
        cas_number: cas_number.to_string(),
        category: category.to_string(),
    })
    .collect()
}

pub fn demo_dashboard() -> DashboardStats {
    DashboardStats {
        network_status: NetworkStatus {
            active_vendors: 142,
            internal_approved: 85,
            external_watchlist: 57,
        },
        risk_alerts: vec![
            RiskAlert {
                level: "HIGH RISK".to_string(),
                region: "South East Asia".to_string(),
                description: "Heavy rains impacting logistics routes in Vietnam & Thailand. \
                              Expect 2-3 week delays for chemical precursors."
                    .to_string(),
                affected_vendors: 12,
            },
            RiskAlert {
                level: "MODERATE".to_string(),
                region: "Eastern Europe".to_string(),
                description: "Energy price fluctuations causing temporary production \
                              slowdowns in non-contracted facilities."
                    .to_string(),
                affected_vendors: 5,
            },
        ],
    }
}

pub fn demo_vendors() -> Vec<VendorRecord> {
    vec![
        VendorRecord {
            is_current_partner: true,
            is_preferred: true,
            available_qty: 50_000,
            certifications: certs(&["GMP", "ISO 9001"]),
            shelf_life: "24 Months".to_string(),
            packaging: "Tripled wrapped (two plastic sleeve + one foil) (25/pack)".to_string(),
            internal_history: Some(history(2018, 1_200_000)),
            total_spend: Some(Decimal::from(1_200_000)),
            risk_assessment: Some(risk(RiskLevel::Low, "Verified partner with consistent history.")),
            website: Some("www.pharmasourceglobal.com".to_string()),
            ..record(1, "PharmaSource Global", Source::Internal, price(1_200), "India", "2 Weeks", 95)
                .located("India", 19.0760, 72.8777)
        },
        VendorRecord {
            is_best_value: true,
            available_qty: 100_000,
            certifications: certs(&["ISO 9001"]),
            shelf_life: "36 Months".to_string(),
            website: Some("www.biochemsolutions.eu".to_string()),
            ..record(2, "BioChem Solutions Ltd", Source::External, price(850), "India", "4 Weeks", 94)
                .located("Germany", 52.5200, 13.4050)
        },
        VendorRecord {
            available_qty: 20_000,
            shelf_life: "24 Months".to_string(),
            packaging: "Bag (25/pack)".to_string(),
            storage: "RT (Up to 25 deg C)".to_string(),
            risk_assessment: Some(risk(RiskLevel::Medium, "Good specs, but longer lead time.")),
            website: Some("www.genericapimakers.com".to_string()),
            ..record(3, "Generic API Makers Inc.", Source::External, price(950), "Asia Pacific", "6 Weeks", 91)
                .located("Hong Kong", 22.3193, 114.1694)
        },
        VendorRecord {
            is_current_partner: true,
            available_qty: 6_000,
            certifications: certs(&["US FDA"]),
            packaging: "Drum (25/pack)".to_string(),
            storage: "RT (2-8 deg C)".to_string(),
            internal_history: Some(history(2020, 210_000)),
            total_spend: Some(Decimal::from(210_000)),
            risk_assessment: Some(risk(
                RiskLevel::Low,
                "Established partner with good track record.",
            )),
            website: Some("www.canadahealthimports.com".to_string()),
            ..record(4, "Canada Health Imports", Source::Internal, price(1_280), "Europe", "2 Weeks", 89)
                .located("Canada", 45.4215, -75.6972)
        },
        VendorRecord {
            is_current_partner: true,
            is_fastest: true,
            available_qty: 25_000,
            certifications: certs(&["GMP", "ISO 9001", "US FDA"]),
            shelf_life: "18 Months".to_string(),
            packaging: "Vacuum sealed (10/pack)".to_string(),
            locking: "Premium".to_string(),
            internal_history: Some(history(2021, 350_000)),
            total_spend: Some(Decimal::from(350_000)),
            risk_assessment: Some(risk(RiskLevel::Low, "Fast delivery partner.")),
            website: Some("www.reliablecompounds.com".to_string()),
            ..record(5, "Reliable Compounds", Source::Internal, price(1_400), "North America", "1 Week", 88)
                .located("USA", 34.0522, -118.2437)
        },
        VendorRecord {
            available_qty: 30_000,
            certifications: certs(&["GMP", "WHO GMP"]),
            packaging: "Standard Box (100/pack)".to_string(),
            storage: "RT (Up to 30 deg C)".to_string(),
            risk_assessment: Some(risk(
                RiskLevel::Medium,
                "New vendor, requires additional verification.",
            )),
            website: Some("www.medchemindia.in".to_string()),
            ..record(6, "MedChem India", Source::External, price(750), "India", "5 Weeks", 86)
                .located("India", 19.0760, 72.8777)
        },
        VendorRecord {
            available_qty: 8_000,
            certifications: certs(&["GMP", "ISO 9001", "EU GMP", "FDA Approved"]),
            shelf_life: "30 Months".to_string(),
            packaging: "Triple wrapped (25/pack)".to_string(),
            locking: "Premium".to_string(),
            risk_assessment: Some(risk(RiskLevel::Low, "Well-established European manufacturer.")),
            website: Some("www.europharma.de".to_string()),
            ..record(7, "EuroPharma GmbH", Source::External, price(1_350), "Europe", "3 Weeks", 92)
                .located("Germany", 48.1351, 11.5820)
        },
        VendorRecord {
            available_qty: 4_000,
            certifications: certs(&["GMP", "TGA Approved"]),
            storage: "RT (Up to 25 deg C)".to_string(),
            website: Some("www.chemsupplyau.com.au".to_string()),
            ..record(8, "ChemSupply Australia", Source::External, price(1_180), "Asia Pacific", "4 Weeks", 84)
                .located("Australia", -33.8688, 151.2093)
        },
        VendorRecord {
            available_qty: 15_000,
            certifications: certs(&["GMP", "ISO 9001", "PMDA"]),
            shelf_life: "36 Months".to_string(),
            packaging: "Vacuum sealed (20/pack)".to_string(),
            locking: "Premium".to_string(),
            risk_assessment: Some(risk(RiskLevel::Low, "High quality Japanese manufacturer.")),
            website: Some("www.tokyopharmasupply.jp".to_string()),
            ..record(9, "Tokyo Pharma Supply", Source::External, price(1_520), "Asia Pacific", "3 Weeks", 90)
                .located("Japan", 35.6762, 139.6503)
        },
        VendorRecord {
            available_qty: 5_000,
            certifications: certs(&["GMP", "ISO 9001", "EU GMP"]),
            packaging: "Cold chain (10/pack)".to_string(),
            storage: "RT (2 - 8 deg C)".to_string(),
            locking: "Premium".to_string(),
            risk_assessment: Some(risk(RiskLevel::Low, "Premium Scandinavian supplier.")),
            website: Some("www.nordicbiomed.se".to_string()),
            ..record(10, "Nordic BioMed", Source::External, price(1_600), "Europe", "2 Weeks", 87)
                .located("Sweden", 59.3293, 18.0686)
        },
        VendorRecord {
            available_qty: 80_000,
            shelf_life: "18 Months".to_string(),
            packaging: "Bulk bag (100/pack)".to_string(),
            storage: "RT (Up to 30 deg C)".to_string(),
            risk_assessment: Some(risk(RiskLevel::Medium, "Budget option with longer lead time.")),
            website: Some("www.mumbaichemicals.in".to_string()),
            ..record(11, "Mumbai Chemicals Ltd", Source::External, price(680), "India", "5 Weeks", 82)
                .located("India", 19.0760, 72.8777)
        },
        VendorRecord {
            available_qty: 12_000,
            certifications: certs(&["GMP", "ANVISA"]),
            risk_assessment: Some(risk(
                RiskLevel::Medium,
                "South American supplier with good capacity.",
            )),
            website: Some("www.brazilpharmaexport.com.br".to_string()),
            ..record(12, "Brazil Pharma Export", Source::External, price(1_050), "North America", "4 Weeks", 83)
                .located("Brazil", -23.5505, -46.6333)
        },
    ]
}

/// Baseline record; defaults follow the most common values in the dataset.
fn record(
    id: u32,
    name: &str,
    source: Source,
    unit_price: Decimal,
    region: &str,
    lead_time: &str,
    suitability_score: u8,
) -> VendorRecord {
    VendorRecord {
        id: VendorId(id),
        name: name.to_string(),
        source,
        is_current_partner: false,
        is_preferred: false,
        is_best_value: false,
        is_fastest: false,
        unit_price,
        total_est_cost: unit_price * Decimal::from(500),
        available_qty: 0,
        total_spend: None,
        region: region.to_string(),
        country: None,
        lat: None,
        lng: None,
        lead_time: lead_time.to_string(),
        shelf_life: "24 Months".to_string(),
        packaging: "Standard Box (50/pack)".to_string(),
        storage: "RT (2 - 25 deg C)".to_string(),
        locking: "Standard".to_string(),
        suitability_score: Some(suitability_score),
        certifications: certs(&["GMP"]),
        internal_history: None,
        risk_assessment: None,
        website: None,
    }
}

impl VendorRecord {
    fn located(self, country: &str, lat: f64, lng: f64) -> Self {
        Self { country: Some(country.to_string()), lat: Some(lat), lng: Some(lng), ..self }
    }
}

fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn certs(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn history(partner_since: i32, lifetime_spend: i64) -> InternalHistory {
    InternalHistory { partner_since, lifetime_spend: Decimal::from(lifetime_spend) }
}

fn risk(level: RiskLevel, description: &str) -> RiskAssessment {
    RiskAssessment { level, description: description.to_string() }
}
