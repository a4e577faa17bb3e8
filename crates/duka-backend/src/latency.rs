//! Simulated network latency.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Per-call delays, in milliseconds.
///
/// The defaults match the delays of the storefront's mock API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyProfile {
    pub product_list_ms: u64,
    pub product_detail_ms: u64,
    pub recommendation_ms: u64,
    pub order_list_ms: u64,
    pub order_detail_ms: u64,
    pub order_submit_ms: u64,
    pub address_list_ms: u64,
    pub address_create_ms: u64,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            product_list_ms: 500,
            product_detail_ms: 300,
            recommendation_ms: 300,
            order_list_ms: 500,
            order_detail_ms: 500,
            order_submit_ms: 1500,
            address_list_ms: 800,
            address_create_ms: 500,
        }
    }
}

impl LatencyProfile {
    /// No delays at all; for tests and scripted runs.
    pub fn zero() -> Self {
        Self {
            product_list_ms: 0,
            product_detail_ms: 0,
            recommendation_ms: 0,
            order_list_ms: 0,
            order_detail_ms: 0,
            order_submit_ms: 0,
            address_list_ms: 0,
            address_create_ms: 0,
        }
    }
}

/// Sleep for `ms` milliseconds; returns immediately for zero.
pub(crate) async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_profile_keeps_defaults() {
        let profile: LatencyProfile = serde_json::from_str(r#"{"order_submit_ms": 10}"#).unwrap();
        assert_eq!(profile.order_submit_ms, 10);
        assert_eq!(profile.product_list_ms, 500);
    }

    #[tokio::test]
    async fn test_pause_waits() {
        let start = tokio::time::Instant::now();
        pause(20).await;
        assert!(start.elapsed() >= Duration::from_millis(20));

        let start = tokio::time::Instant::now();
        pause(0).await;
        assert!(start.elapsed() < Duration::from_millis(20));
    }
}
