//! Disaster AI - Core library
//!
//! Feature extraction, anomaly and text models, fusion, and the
//! orchestrator client. Shared by the `orchestrator` and `train` binaries
//! and by the prediction server.

pub mod constants;
pub mod logic;
