//! Fusion Engine
//!
//! Input: one SensorVerdict + N TextVerdicts
//! Output: FusionDecision
//!
//! Pure and stateless; every call is independent.

use super::rules::FusionThresholds;
use super::types::{FusionDecision, FusionRule, RuleEvaluation};
use crate::logic::model::{SensorVerdict, TextVerdict};

/// Decide with default thresholds
pub fn decide(sensor: &SensorVerdict, texts: &[TextVerdict]) -> FusionDecision {
    decide_with_thresholds(sensor, texts, &FusionThresholds::default())
}

/// Decide with custom thresholds.
///
/// Rules are evaluated in priority order and all of them land in the
/// `rules` trace. A rule fires when its condition holds; the social
/// corroboration rule only fires if no earlier rule raised the alert.
pub fn decide_with_thresholds(
    sensor: &SensorVerdict,
    texts: &[TextVerdict],
    thresholds: &FusionThresholds,
) -> FusionDecision {
    let tweet_alert_count = texts.iter().filter(|t| t.label == 1).count();
    let avg_tweet_confidence = if texts.is_empty() {
        0.0
    } else {
        texts.iter().map(|t| t.confidence).sum::<f64>() / texts.len() as f64
    };

    let mut alert = false;
    let mut reasons = Vec::new();
    let mut rules = Vec::with_capacity(FusionRule::ALL.len());

    for rule in FusionRule::ALL {
        let (matched, fired) = match rule {
            FusionRule::SensorAnomaly => {
                let matched = sensor.is_anomaly;
                (matched, matched)
            }
            FusionRule::SensorSocial => {
                let matched = sensor.score >= thresholds.sensor_score_min
                    && tweet_alert_count >= thresholds.tweet_alerts_min;
                (matched, matched && !alert)
            }
        };

        if fired {
            alert = true;
            reasons.push(rule);
        }
        rules.push(RuleEvaluation { rule, matched, fired });
    }

    FusionDecision {
        alert,
        reasons,
        sensor_score: sensor.score,
        tweet_alert_count,
        avg_tweet_confidence,
        rules,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor(is_anomaly: bool, score: f64) -> SensorVerdict {
        SensorVerdict { is_anomaly, score }
    }

    fn tweets(labels: &[u8]) -> Vec<TextVerdict> {
        labels
            .iter()
            .map(|&label| TextVerdict { label, confidence: 0.8 })
            .collect()
    }

    #[test]
    fn test_empty_texts_average_is_zero() {
        let decision = decide(&sensor(false, 0.1), &[]);
        assert_eq!(decision.avg_tweet_confidence, 0.0);
        assert_eq!(decision.tweet_alert_count, 0);
        assert!(!decision.alert);
        assert!(decision.reasons.is_empty());
    }

    #[test]
    fn test_sensor_anomaly_has_priority() {
        let decision = decide(&sensor(true, 0.9), &tweets(&[1, 1, 1, 1, 1]));
        assert!(decision.alert);
        assert!(decision.has_reason(FusionRule::SensorAnomaly));
        assert_eq!(decision.reasons[0], FusionRule::SensorAnomaly);
        assert_eq!(decision.tweet_alert_count, 5);

        // Corroboration matched but did not need to fire
        let social = decision.rules.iter().find(|r| r.rule == FusionRule::SensorSocial).unwrap();
        assert!(social.matched);
        assert!(!social.fired);
    }

    #[test]
    fn test_anomaly_alone_is_enough() {
        let decision = decide(&sensor(true, -0.3), &[]);
        assert!(decision.alert);
        assert_eq!(decision.reasons, vec![FusionRule::SensorAnomaly]);
    }

    #[test]
    fn test_fusion_at_threshold() {
        let decision = decide(&sensor(false, 0.6), &tweets(&[1, 1]));
        assert!(decision.alert);
        assert_eq!(decision.reasons, vec![FusionRule::SensorSocial]);
    }

    #[test]
    fn test_fusion_below_threshold() {
        let decision = decide(&sensor(false, 0.59), &tweets(&[1, 1]));
        assert!(!decision.alert);
        assert!(decision.reasons.is_empty());
    }

    #[test]
    fn test_fusion_needs_two_social_alerts() {
        let decision = decide(&sensor(false, 0.95), &tweets(&[1, 0, 0]));
        assert!(!decision.alert);
        assert_eq!(decision.tweet_alert_count, 1);
    }

    #[test]
    fn test_average_confidence_covers_all_labels() {
        let texts = vec![
            TextVerdict { label: 1, confidence: 0.9 },
            TextVerdict { label: 0, confidence: 0.6 },
        ];
        let decision = decide(&sensor(false, 0.0), &texts);
        assert!((decision.avg_tweet_confidence - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = FusionThresholds { sensor_score_min: 0.2, tweet_alerts_min: 1 };
        let decision = decide_with_thresholds(&sensor(false, 0.25), &tweets(&[1]), &thresholds);
        assert!(decision.alert);
    }

    #[test]
    fn test_reason_names_serialize() {
        let decision = decide(&sensor(false, 0.7), &tweets(&[1, 1]));
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["reasons"][0], "fusion_sensor+social");
        assert_eq!(json["rules"][0]["rule"], "sensor_anomaly");
    }
}
