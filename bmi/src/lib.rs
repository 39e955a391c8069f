//! Body mass index computation and classification.
//!
//! Everything here is pure: inputs are assumed validated upstream, so none of
//! these functions fail.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const CM_PER_INCH: f64 = 2.54;
pub const KG_PER_POUND: f64 = 0.453592;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

/// Raw height and weight as entered by staff.
#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    pub height: f64,
    pub weight: f64,
    pub unit: UnitSystem,
}

impl Measurement {
    pub fn metric(height_cm: f64, weight_kg: f64) -> Self {
        Measurement {
            height: height_cm,
            weight: weight_kg,
            unit: UnitSystem::Metric,
        }
    }

    /// Height in centimetres and weight in kilograms.
    pub fn to_metric(self) -> (f64, f64) {
        match self.unit {
            UnitSystem::Metric => (self.height, self.weight),
            UnitSystem::Imperial => (self.height * CM_PER_INCH, self.weight * KG_PER_POUND),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal Weight")]
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::NormalWeight
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    /// Parses the stored label. `Normal` is accepted for older rows.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Underweight" => Some(BmiCategory::Underweight),
            "Normal Weight" | "Normal" => Some(BmiCategory::NormalWeight),
            "Overweight" => Some(BmiCategory::Overweight),
            "Obese" => Some(BmiCategory::Obese),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => {
                "💡 Consider consulting a nutritionist to develop a healthy weight gain plan."
            }
            BmiCategory::NormalWeight => {
                "✅ Great job! Maintain your current lifestyle with regular exercise and balanced diet."
            }
            BmiCategory::Overweight => {
                "⚠️ Consider a structured fitness plan and dietary adjustments to reach optimal health."
            }
            BmiCategory::Obese => {
                "🔴 We recommend immediate consultation with our fitness experts for a personalized plan."
            }
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advice line for a stored category label; unknown labels get a generic line.
pub fn advice_for(label: &str) -> &'static str {
    BmiCategory::parse(label)
        .map(|c| c.advice())
        .unwrap_or("📞 Contact our fitness experts for personalized advice.")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub height_cm: f64,
    pub weight_kg: f64,
    /// Rounded to one decimal.
    pub bmi: f64,
    pub category: BmiCategory,
}

/// `weight / (height/100)^2`, unrounded.
pub fn compute(height_cm: f64, weight_kg: f64) -> f64 {
    let meters = height_cm / 100.0;
    weight_kg / (meters * meters)
}

/// One decimal place, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Converts to metric once, then rounds and classifies.
/// The category always agrees with the stored rounded value.
pub fn assess(measurement: Measurement) -> Assessment {
    let (height_cm, weight_kg) = measurement.to_metric();
    let bmi = round1(compute(height_cm, weight_kg));
    Assessment {
        height_cm,
        weight_kg,
        bmi,
        category: BmiCategory::from_bmi(bmi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typical_metric_assessment() {
        let a = assess(Measurement::metric(160.0, 55.0));
        assert_eq!(a.bmi, 21.5);
        assert_eq!(a.category, BmiCategory::NormalWeight);
    }

    #[test]
    fn category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::NormalWeight);
        assert_eq!(BmiCategory::from_bmi(24.9), BmiCategory::NormalWeight);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.9), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn category_follows_rounded_value() {
        // 24.958... rounds up to 25.0
        let a = assess(Measurement::metric(170.0, 72.13));
        assert_eq!(a.bmi, 25.0);
        assert_eq!(a.category, BmiCategory::Overweight);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round1(21.25), 21.3);
        assert_eq!(round1(21.24), 21.2);
    }

    #[test]
    fn imperial_converted_exactly_once() {
        let imperial = assess(Measurement {
            height: 63.0,
            weight: 121.0,
            unit: UnitSystem::Imperial,
        });
        let manual = assess(Measurement::metric(63.0 * 2.54, 121.0 * 0.453592));
        assert_eq!(imperial, manual);
        assert!((imperial.height_cm - 160.02).abs() < 1e-9);
    }

    #[test]
    fn labels_and_advice() {
        assert_eq!(BmiCategory::NormalWeight.to_string(), "Normal Weight");
        assert_eq!(BmiCategory::parse("Normal"), Some(BmiCategory::NormalWeight));
        assert!(advice_for("Obese").starts_with("🔴"));
        assert!(advice_for("Unknown").starts_with("📞"));
    }
}
