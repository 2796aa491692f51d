use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MIN_OPACITY: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpendColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub opacity: f64,
}

impl fmt::Display for SpendColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.red, self.green, self.blue, self.opacity)
    }
}

/// Choropleth color ramp: light blue-purple for low spend, deeper and more opaque
/// blue for high spend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpendColorScale {
    pub low: Rgb,
    pub high: Rgb,
}

impl Default for SpendColorScale {
    fn default() -> Self {
        Self {
            low: Rgb { red: 120, green: 140, blue: 245 },
            high: Rgb { red: 80, green: 110, blue: 220 },
        }
    }
}

impl SpendColorScale {
    /// `None` for zero spend. A non-positive `max_spend` is treated as 1.
    pub fn color_for(&self, spend: Decimal, max_spend: Decimal) -> Option<SpendColor> {
        if spend.is_zero() {
            return None;
        }

        let max_spend = if max_spend > Decimal::ZERO { max_spend } else { Decimal::ONE };
        let intensity = (spend / max_spend).to_f64().unwrap_or(1.0).clamp(0.0, 1.0);

        Some(SpendColor {
            red: channel(self.low.red, self.high.red, intensity),
            green: channel(self.low.green, self.high.green, intensity),
            blue: channel(self.low.blue, self.high.blue, intensity),
            opacity: MIN_OPACITY + intensity * (1.0 - MIN_OPACITY),
        })
    }
}

pub fn color_for_spend(spend: Decimal, max_spend: Decimal) -> Option<SpendColor> {
    SpendColorScale::default().color_for(spend, max_spend)
}

fn channel(low: u8, high: u8, intensity: f64) -> u8 {
    let value = (f64::from(low) + (f64::from(high) - f64::from(low)) * intensity).floor();
    value.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{color_for_spend, SpendColor};

    #[test]
    fn zero_spend_has_no_color() {
        assert_eq!(color_for_spend(Decimal::ZERO, Decimal::new(1_000, 0)), None);
        assert_eq!(color_for_spend(Decimal::ZERO, Decimal::ZERO), None);
    }

    #[test]
    fn max_spend_gets_high_color_fully_opaque() {
        let color = color_for_spend(Decimal::new(500, 0), Decimal::new(500, 0)).expect("color");
        assert_eq!(color, SpendColor { red: 80, green: 110, blue: 220, opacity: 1.0 });
        assert_eq!(color.to_string(), "rgba(80, 110, 220, 1)");
    }

    #[test]
    fn half_spend_interpolates_and_floors_channels() {
        let color = color_for_spend(Decimal::new(250, 0), Decimal::new(500, 0)).expect("color");
        assert_eq!(color, SpendColor { red: 100, green: 125, blue: 232, opacity: 0.75 });
    }

    #[test]
    fn spend_above_max_is_clamped() {
        let color = color_for_spend(Decimal::new(900, 0), Decimal::new(300, 0)).expect("color");
        assert_eq!(color.opacity, 1.0);
        assert_eq!((color.red, color.green, color.blue), (80, 110, 220));
    }

    #[test]
    fn opacity_is_monotonic_in_spend_share() {
        let max = Decimal::new(1_000, 0);
        let opacities = (1..=10)
            .map(|step| color_for_spend(Decimal::new(step * 100, 0), max).expect("color").opacity)
            .collect::<Vec<_>>();

        assert!(opacities.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(opacities.iter().all(|opacity| (0.5..=1.0).contains(opacity)));
    }

    #[test]
    fn non_positive_max_is_treated_as_one() {
        let color = color_for_spend(Decimal::new(5, 1), Decimal::ZERO).expect("color");
        assert_eq!(color.opacity, 0.75);
    }
}
