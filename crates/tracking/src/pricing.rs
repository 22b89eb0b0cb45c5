//! Shipping cost estimation.

use serde::{Deserialize, Serialize};
use std::fmt;
use swiftify_core::config::PricingConfig;

/// Declared parcel weight band.
///
/// Parsing never fails: unknown labels are kept as [`WeightClass::Unrecognized`]
/// and priced with the default multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeightClass {
    UnderOneKg,
    OneToFiveKg,
    FiveToTenKg,
    TenToTwentyKg,
    OverTwentyKg,
    Unrecognized(String),
}

impl WeightClass {
    /// The recognized bands, lightest first.
    pub const KNOWN: [WeightClass; 5] = [
        WeightClass::UnderOneKg,
        WeightClass::OneToFiveKg,
        WeightClass::FiveToTenKg,
        WeightClass::TenToTwentyKg,
        WeightClass::OverTwentyKg,
    ];

    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "<1kg" => Self::UnderOneKg,
            "1-5kg" => Self::OneToFiveKg,
            "5-10kg" => Self::FiveToTenKg,
            "10-20kg" => Self::TenToTwentyKg,
            "20kg+" => Self::OverTwentyKg,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::UnderOneKg => "<1kg",
            Self::OneToFiveKg => "1-5kg",
            Self::FiveToTenKg => "5-10kg",
            Self::TenToTwentyKg => "10-20kg",
            Self::OverTwentyKg => "20kg+",
            Self::Unrecognized(label) => label,
        }
    }

    /// Cost multiplier for this band.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::UnderOneKg => 1.0,
            Self::OneToFiveKg => 1.2,
            Self::FiveToTenKg => 1.5,
            Self::TenToTwentyKg => 2.0,
            Self::OverTwentyKg => 2.5,
            Self::Unrecognized(_) => 1.0,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for WeightClass {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<&str> for WeightClass {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl From<WeightClass> for String {
    fn from(class: WeightClass) -> Self {
        class.label().to_string()
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Prices a parcel from its weight band and route distance.
///
/// `cost = base_cost * weight multiplier * max(1, distance_km / divisor)`,
/// rounded to cents. Distances under one divisor cost the same as exactly one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimator {
    base_cost: f64,
    distance_divisor_km: f64,
}

impl CostEstimator {
    pub fn new(base_cost: f64, distance_divisor_km: f64) -> Self {
        Self {
            base_cost,
            distance_divisor_km,
        }
    }

    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(config.base_cost, config.distance_divisor_km)
    }

    pub fn estimate(&self, weight: &WeightClass, distance_km: f64) -> f64 {
        let distance_multiplier = (distance_km / self.distance_divisor_km).max(1.0);
        round_cents(self.base_cost * weight.multiplier() * distance_multiplier)
    }

    pub fn base_cost(&self) -> f64 {
        self.base_cost
    }
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::from_config(&PricingConfig::default())
    }
}

/// Estimates with the default pricing table.
pub fn estimate(weight: &WeightClass, distance_km: f64) -> f64 {
    CostEstimator::default().estimate(weight, distance_km)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_quote() {
        assert_eq!(estimate(&WeightClass::OneToFiveKg, 100.0), 18.00);
    }

    #[test]
    fn test_short_distances_cost_the_minimum() {
        let estimator = CostEstimator::default();
        assert_eq!(estimator.estimate(&WeightClass::UnderOneKg, 0.0), 15.00);
        assert_eq!(estimator.estimate(&WeightClass::UnderOneKg, 42.0), 15.00);
    }

    #[test]
    fn test_multiplier_table() {
        let quotes: Vec<f64> = WeightClass::KNOWN.iter().map(|w| estimate(w, 100.0)).collect();
        assert_eq!(quotes, vec![15.0, 18.0, 22.5, 30.0, 37.5]);
    }

    #[test]
    fn test_long_distance_scales_linearly() {
        assert_eq!(estimate(&WeightClass::OverTwentyKg, 559.12), 209.67);
    }

    #[test]
    fn test_unrecognized_weight_uses_default_multiplier() {
        let weight = WeightClass::from_label("2-5kg");
        assert!(!weight.is_recognized());
        assert_eq!(weight.label(), "2-5kg");
        assert_eq!(estimate(&weight, 100.0), 15.00);
    }

    #[test]
    fn test_custom_pricing() {
        let estimator = CostEstimator::new(20.0, 50.0);
        assert_eq!(estimator.estimate(&WeightClass::FiveToTenKg, 100.0), 60.00);
    }

    #[test]
    fn test_weight_class_serde_uses_labels() {
        let json = serde_json::to_string(&WeightClass::TenToTwentyKg).unwrap();
        assert_eq!(json, "\"10-20kg\"");
        let parsed: WeightClass = serde_json::from_str("\"heavy\"").unwrap();
        assert_eq!(parsed, WeightClass::Unrecognized("heavy".into()));
    }

    fn weight_class() -> impl Strategy<Value = WeightClass> {
        prop_oneof![
            Just(WeightClass::UnderOneKg),
            Just(WeightClass::OneToFiveKg),
            Just(WeightClass::FiveToTenKg),
            Just(WeightClass::TenToTwentyKg),
            Just(WeightClass::OverTwentyKg),
            "[a-z]{1,6}".prop_map(WeightClass::Unrecognized),
        ]
    }

    proptest! {
        #[test]
        fn prop_monotonic_in_distance(w in weight_class(), a in 0.0f64..5000.0, b in 0.0f64..5000.0) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(estimate(&w, near) <= estimate(&w, far));
        }

        #[test]
        fn prop_monotonic_in_weight(d in 0.0f64..5000.0) {
            for pair in WeightClass::KNOWN.windows(2) {
                prop_assert!(estimate(&pair[0], d) <= estimate(&pair[1], d));
            }
        }

        #[test]
        fn prop_never_below_base_times_multiplier(w in weight_class(), d in 0.0f64..5000.0) {
            let floor = (15.0 * w.multiplier() * 100.0).round() / 100.0;
            prop_assert!(estimate(&w, d) >= floor);
        }
    }
}
