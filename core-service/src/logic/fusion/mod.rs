//! Fusion Module
//!
//! Kết hợp verdict của sensor model và text model thành một quyết định
//! cảnh báo duy nhất, kèm lý do.
//!
//! ## Structure
//! - `types`: FusionRule, RuleEvaluation, FusionDecision
//! - `rules`: thresholds and constants
//! - `engine`: decision logic
//!
//! ## Usage
//! ```ignore
//! use disaster_core::logic::fusion::decide;
//!
//! let decision = decide(&sensor_verdict, &text_verdicts);
//! if decision.alert {
//!     println!("ALERT: {:?}", decision.reasons);
//! }
//! ```

pub mod engine;
pub mod rules;
pub mod types;

pub use engine::{decide, decide_with_thresholds};
pub use rules::{FusionThresholds, MIN_TWEET_ALERTS, SENSOR_SCORE_THRESHOLD};
pub use types::{FusionDecision, FusionRule, RuleEvaluation};
