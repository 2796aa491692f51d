//! Completeness-based suitability scoring for feed records that arrive unscored.

pub const BASE_COMPLETENESS_SCORE: u8 = 50;
pub const COMPLETENESS_FIELD_POINTS: u8 = 10;
pub const MAX_COMPLETENESS_SCORE: u8 = 100;

/// Which informative fields a raw vendor record actually carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompletenessSignals {
    pub has_price: bool,
    pub has_certifications: bool,
    pub has_shelf_life_or_storage: bool,
    pub has_packaging: bool,
    pub has_locking: bool,
}

impl CompletenessSignals {
    fn present_fields(&self) -> u8 {
        [
            self.has_price,
            self.has_certifications,
            self.has_shelf_life_or_storage,
            self.has_packaging,
            self.has_locking,
        ]
        .into_iter()
        .filter(|present| *present)
        .count() as u8
    }
}

pub fn completeness_score(signals: &CompletenessSignals) -> u8 {
    let earned = signals.present_fields().saturating_mul(COMPLETENESS_FIELD_POINTS);
    BASE_COMPLETENESS_SCORE.saturating_add(earned).min(MAX_COMPLETENESS_SCORE)
}
