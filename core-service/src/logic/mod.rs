//! Logic Module - Detection engines
//!
//! Chứa các engine xử lý: feature extraction, models, fusion, ingest.
//!
//! ## Architecture
//! - `features/` - Sensor window → fixed feature vector
//! - `text/` - Social post cleaning
//! - `model/` - Isolation forest, TF-IDF + logistic regression, artifacts
//! - `fusion/` - Sensor + social verdicts → alert decision
//! - `ingest/` - Realtime Database / CSV data sources
//! - `orchestrator/` - Prediction API client + fuse_and_decide
//! - `training/` - Offline model fitting

pub mod config;

pub mod features;
pub mod fusion;
pub mod ingest;
pub mod model;
pub mod orchestrator;
pub mod text;
pub mod training;
