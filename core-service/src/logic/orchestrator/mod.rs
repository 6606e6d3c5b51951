//! Orchestrator Module
//!
//! Gọi prediction API cho một sensor window và một loạt post, rồi fuse
//! kết quả thành quyết định cảnh báo.
//!
//! Calls are sequential: one sensor call, then one text call per post.
//! Transport errors abort the cycle; there are no retries.

pub mod client;

use crate::logic::features::SensorRecord;
use crate::logic::fusion::{self, FusionDecision};

pub use client::{ClientError, PredictClient, SensorResponse, TextResponse};

/// Query both endpoints and fuse the verdicts
pub async fn fuse_and_decide<S: AsRef<str>>(
    client: &PredictClient,
    window: &[SensorRecord],
    posts: &[S],
) -> Result<FusionDecision, ClientError> {
    let sensor = client.predict_sensor(window).await?;

    let mut texts = Vec::with_capacity(posts.len());
    for post in posts {
        texts.push(client.predict_text(post.as_ref()).await?);
    }

    let decision = fusion::decide(&sensor, &texts);
    log::debug!(
        "fused window_len={} posts={} sensor_score={:.3} tweet_alerts={} alert={}",
        window.len(),
        posts.len(),
        decision.sensor_score,
        decision.tweet_alert_count,
        decision.alert
    );
    Ok(decision)
}

/// Fixed demo input: a calm window and three posts
pub fn demo_input() -> (Vec<SensorRecord>, Vec<String>) {
    let window = (0..10)
        .map(|_| {
            SensorRecord::new()
                .with("vibration", 10)
                .with("flame", 0)
                .with("water", 30)
        })
        .collect();
    let posts = vec![
        "Flood reported near river bank".to_string(),
        "We need help!".to_string(),
        "Beautiful day".to_string(),
    ];
    (window, posts)
}
