//! Fusion Types
//!
//! Core types cho fusion decision.
//! KHÔNG chứa logic - chỉ data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// FUSION RULES
// ============================================================================

/// Decision rules, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FusionRule {
    /// Sensor model flagged the window as an outlier
    #[serde(rename = "sensor_anomaly")]
    SensorAnomaly,
    /// Elevated sensor score corroborated by several social alerts
    #[serde(rename = "fusion_sensor+social")]
    SensorSocial,
}

impl FusionRule {
    /// All rules, in evaluation order
    pub const ALL: [FusionRule; 2] = [FusionRule::SensorAnomaly, FusionRule::SensorSocial];

    pub fn as_str(&self) -> &'static str {
        match self {
            FusionRule::SensorAnomaly => "sensor_anomaly",
            FusionRule::SensorSocial => "fusion_sensor+social",
        }
    }
}

impl std::fmt::Display for FusionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RULE TRACE
// ============================================================================

/// How one rule evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEvaluation {
    pub rule: FusionRule,
    /// Condition held on the inputs
    pub matched: bool,
    /// Rule contributed to the decision (appended to reasons)
    pub fired: bool,
}

// ============================================================================
// DECISION
// ============================================================================

/// Final fused decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionDecision {
    pub alert: bool,
    /// Names of fired rules, priority order
    pub reasons: Vec<FusionRule>,
    pub sensor_score: f64,
    pub tweet_alert_count: usize,
    pub avg_tweet_confidence: f64,
    /// Every rule, fired or not
    pub rules: Vec<RuleEvaluation>,
}

impl FusionDecision {
    pub fn has_reason(&self, rule: FusionRule) -> bool {
        self.reasons.contains(&rule)
    }
}
