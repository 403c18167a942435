use serde::{Deserialize, Serialize};

use crate::error::QualityError;
use crate::model::IssueKind;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Engine configuration. Every section is optional; an empty file yields the
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QualityConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Tier bounds and rule cutoffs. Empirically chosen, hence configurable.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub high_min_similarity: f64,
    pub high_max_price_ratio: f64,
    pub medium_min_similarity: f64,
    pub medium_max_price_ratio: f64,
    /// Any single pair below this raises a low-pair-similarity issue.
    pub low_pair_similarity: f64,
    /// Groups above this ratio raise a high-price-spread issue.
    pub high_spread_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high_min_similarity: 0.80,
            high_max_price_ratio: 1.5,
            medium_min_similarity: 0.70,
            medium_max_price_ratio: 2.0,
            low_pair_similarity: 0.60,
            high_spread_ratio: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Rules + Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// Rule kinds that are skipped entirely.
    pub disabled: Vec<IssueKind>,
}

impl RulesConfig {
    pub fn is_enabled(&self, kind: IssueKind) -> bool {
        !self.disabled.contains(&kind)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// How many HIGH-tier groups to list by savings.
    pub top_savings: usize,
    /// How many LOW-tier or flagged groups to sample for spot-checking.
    pub review_sample: usize,
    /// How many title-only (`brand = "generic"`) groups to sample for
    /// spot-checking, whatever their tier.
    pub generic_sample: usize,
    /// Store roster; any store with no listings at all is reported missing.
    pub expected_stores: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_savings: 15,
            review_sample: 5,
            generic_sample: 5,
            expected_stores: DEFAULT_STORES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub const DEFAULT_STORES: [&str; 11] = [
    "Tesery",
    "Yeslak",
    "Hansshow",
    "TapTes",
    "EVANNEX",
    "RPM Tesla",
    "Abstract Ocean",
    "TESBROS",
    "Teslarati Shop",
    "Teslahubs",
    "Tesmanian",
];

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl QualityConfig {
    pub fn from_toml(input: &str) -> Result<Self, QualityError> {
        let config: QualityConfig =
            toml::from_str(input).map_err(|e| QualityError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, QualityError> {
        toml::to_string_pretty(self).map_err(|e| QualityError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), QualityError> {
        let t = &self.thresholds;

        for (name, value) in [
            ("high_min_similarity", t.high_min_similarity),
            ("medium_min_similarity", t.medium_min_similarity),
            ("low_pair_similarity", t.low_pair_similarity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(QualityError::ConfigValidation(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        for (name, value) in [
            ("high_max_price_ratio", t.high_max_price_ratio),
            ("medium_max_price_ratio", t.medium_max_price_ratio),
            ("high_spread_ratio", t.high_spread_ratio),
        ] {
            if !value.is_finite() || value < 1.0 {
                return Err(QualityError::ConfigValidation(format!(
                    "{name} must be a finite ratio >= 1, got {value}"
                )));
            }
        }

        // Tiers nest: MEDIUM is never stricter than HIGH.
        if t.medium_min_similarity > t.high_min_similarity {
            return Err(QualityError::ConfigValidation(format!(
                "medium_min_similarity ({}) exceeds high_min_similarity ({})",
                t.medium_min_similarity, t.high_min_similarity
            )));
        }
        if t.medium_max_price_ratio < t.high_max_price_ratio {
            return Err(QualityError::ConfigValidation(format!(
                "medium_max_price_ratio ({}) is below high_max_price_ratio ({})",
                t.medium_max_price_ratio, t.high_max_price_ratio
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
