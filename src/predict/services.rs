//! Fire-risk scorer.
//!
//! A fixed linear model squashed through the logistic function:
//!
//! ```text
//! score       = Σ coefficient_i · feature_i
//! probability = 1 / (1 + e^-score)
//! ```
//!
//! Vegetation dominates, humidity lowers the risk.

use serde::Serialize;

/// Model coefficients, in reporting order.
pub const COEFFICIENTS: [(&str, f64); 4] = [
    ("temperature", 0.02),
    ("humidity", -0.03),
    ("wind_speed", 0.015),
    ("vegetation_index", 2.0),
];

/// Probabilities at or above this are `HIGH`.
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

pub const EXPLANATION: &str =
    "Probability via logistic(sigmoid) over weighted features; vegetation dominates, humidity reduces risk.";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Features {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub vegetation_index: f64,
}

impl Features {
    fn values(&self) -> [f64; 4] {
        [
            self.temperature,
            self.humidity,
            self.wind_speed,
            self.vegetation_index,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    pub fn from_probability(p: f64) -> Self {
        if p >= HIGH_RISK_THRESHOLD {
            Self::High
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureImportance {
    pub feature: &'static str,
    pub importance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub probability: f64,
    pub risk: RiskLevel,
    pub feature_importance: Vec<FeatureImportance>,
    pub explanation: &'static str,
}

pub fn score(features: &Features) -> f64 {
    COEFFICIENTS
        .iter()
        .zip(features.values())
        .map(|((_, w), x)| w * x)
        .sum()
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// `|coefficient| / Σ|coefficient|` per feature.
pub fn feature_importance() -> Vec<FeatureImportance> {
    let total: f64 = COEFFICIENTS.iter().map(|(_, w)| w.abs()).sum();
    let total = if total == 0.0 { 1.0 } else { total };
    COEFFICIENTS
        .iter()
        .map(|&(feature, w)| FeatureImportance {
            feature,
            importance: w.abs() / total,
        })
        .collect()
}

pub fn predict(features: &Features) -> Prediction {
    // label the reported (rounded) value so the two never disagree
    let probability = round6(sigmoid(score(features)));
    Prediction {
        probability,
        risk: RiskLevel::from_probability(probability),
        feature_importance: feature_importance(),
        explanation: EXPLANATION,
    }
}

#[cfg(test)]
mod scorer_tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn reference_example_is_high_risk() {
        let f = Features {
            temperature: 35.0,
            humidity: 20.0,
            wind_speed: 10.0,
            vegetation_index: 0.8,
        };
        assert!((score(&f) - 1.85).abs() < 1e-12);

        let p = predict(&f);
        assert_eq!(p.probability, 0.864127);
        assert_eq!(p.risk, RiskLevel::High);
        assert_eq!(p.explanation, EXPLANATION);
    }

    #[test]
    fn zero_features_give_even_odds() {
        let p = predict(&Features::default());
        assert_eq!(p.probability, 0.5);
        assert_eq!(p.risk, RiskLevel::Low);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(RiskLevel::from_probability(0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.699999), RiskLevel::Low);
    }

    #[test]
    fn extreme_scores_saturate() {
        let hot = Features { vegetation_index: 1e6, ..Default::default() };
        let wet = Features { humidity: 1e6, ..Default::default() };
        assert_eq!(predict(&hot).probability, 1.0);
        assert_eq!(predict(&wet).probability, 0.0);
    }

    #[test]
    fn importance_is_normalized_and_ordered() {
        let fi = feature_importance();
        let names: Vec<_> = fi.iter().map(|f| f.feature).collect();
        assert_eq!(names, ["temperature", "humidity", "wind_speed", "vegetation_index"]);

        let sum: f64 = fi.iter().map(|f| f.importance).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!((fi[3].importance - 2.0 / 2.065).abs() < 1e-12);
    }

    #[test]
    fn probability_bounds_and_label_hold_for_random_inputs() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2_000 {
            let f = Features {
                temperature: rng.gen_range(-60.0..=80.0),
                humidity: rng.gen_range(0.0..=100.0),
                wind_speed: rng.gen_range(0.0..=200.0),
                vegetation_index: rng.gen_range(-1.0..=1.0),
            };
            let p = predict(&f);
            assert!((0.0..=1.0).contains(&p.probability));
            assert_eq!(p.risk == RiskLevel::High, p.probability >= 0.7);
        }
    }

    #[test]
    fn risk_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
        assert_eq!(serde_json::to_string(&RiskLevel::Low).unwrap(), "\"LOW\"");
    }
}
