use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::PredictError;

/// Accepted fasting glucose range, mg/dL.
pub const GLUCOSE_RANGE: RangeInclusive<f64> = 20.0..=600.0;
/// Accepted body-mass index range, kg/m².
pub const BMI_RANGE: RangeInclusive<f64> = 10.0..=100.0;

/// Biological sex as captured on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => f.write_str("Male"),
            Sex::Female => f.write_str("Female"),
        }
    }
}

/// The three biomarkers sent to the predictor. Immutable once submitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionInput {
    pub sex: Sex,
    /// Fasting glucose in mg/dL.
    pub glucose: f64,
    /// Body-mass index in kg/m².
    pub bmi: f64,
}

impl PredictionInput {
    /// Range-checks the numeric fields before any network activity.
    pub fn validate(&self) -> Result<(), PredictError> {
        if !self.glucose.is_finite() || !GLUCOSE_RANGE.contains(&self.glucose) {
            return Err(PredictError::Validation(format!(
                "glucose {} mg/dL outside {}-{}",
                self.glucose,
                GLUCOSE_RANGE.start(),
                GLUCOSE_RANGE.end()
            )));
        }
        if !self.bmi.is_finite() || !BMI_RANGE.contains(&self.bmi) {
            return Err(PredictError::Validation(format!(
                "BMI {} kg/m² outside {}-{}",
                self.bmi,
                BMI_RANGE.start(),
                BMI_RANGE.end()
            )));
        }
        Ok(())
    }
}

/// Risk band assigned by the predictor. Variant order encodes severity,
/// and each band owns its canonical display color, so presentation code
/// never inspects the wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Normal,
    #[serde(rename = "Mild Resistance")]
    MildResistance,
    #[serde(rename = "Severe Resistance")]
    SevereResistance,
}

impl RiskLevel {
    /// Exact strings the response schema restricts `riskLevel` to.
    pub const WIRE_VALUES: [&'static str; 3] =
        ["Normal", "Mild Resistance", "Severe Resistance"];

    /// Canonical hex color for the band.
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Normal => "#10b981",
            RiskLevel::MildResistance => "#f59e0b",
            RiskLevel::SevereResistance => "#ef4444",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let idx = *self as usize;
        f.write_str(Self::WIRE_VALUES[idx])
    }
}

/// Structured estimate returned by the predictor. Deserialization is the
/// acceptance gate: a missing field, a non-numeric index or an unknown
/// `riskLevel` string all fail the parse, so no partial result can exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub homa_index: f64,
    pub risk_level: RiskLevel,
    /// Color hint chosen by the model; the UI prefers `RiskLevel::color`.
    pub risk_color: String,
    pub explanation: String,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> PredictionInput {
        PredictionInput {
            sex: Sex::Female,
            glucose: 95.0,
            bmi: 24.5,
        }
    }

    #[test]
    fn test_valid_input_passes_validation() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_glucose_rejected() {
        let mut input = valid_input();
        input.glucose = 700.0;
        assert!(matches!(
            input.validate(),
            Err(PredictError::Validation(_))
        ));
        input.glucose = 5.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_out_of_range_bmi_rejected() {
        let mut input = valid_input();
        input.bmi = 101.0;
        assert!(input.validate().is_err());
        input.bmi = f64::NAN;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_boundary_values_accepted() {
        let input = PredictionInput {
            sex: Sex::Male,
            glucose: 20.0,
            bmi: 100.0,
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_risk_level_wire_strings_round_trip() {
        for (level, wire) in [
            (RiskLevel::Normal, "\"Normal\""),
            (RiskLevel::MildResistance, "\"Mild Resistance\""),
            (RiskLevel::SevereResistance, "\"Severe Resistance\""),
        ] {
            assert_eq!(serde_json::to_string(&level).unwrap(), wire);
            let parsed: RiskLevel = serde_json::from_str(wire).unwrap();
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn test_unknown_risk_level_rejected() {
        assert!(serde_json::from_str::<RiskLevel>("\"Moderate\"").is_err());
    }

    #[test]
    fn test_band_ordering_and_colors() {
        assert!(RiskLevel::Normal < RiskLevel::MildResistance);
        assert!(RiskLevel::MildResistance < RiskLevel::SevereResistance);
        assert_eq!(RiskLevel::Normal.color(), "#10b981");
        assert_eq!(RiskLevel::MildResistance.color(), "#f59e0b");
        assert_eq!(RiskLevel::SevereResistance.color(), "#ef4444");
    }
}
