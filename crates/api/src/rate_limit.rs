//! Upload Rate Limiting using GCRA
//!
//! Limits diagnosis uploads per client IP with tower_governor. Each upload
//! parses a full telemetry log, so the default quota is small.

use governor::middleware::StateInformationMiddleware;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tracing::{debug, warn};

/// Governor config keyed by peer IP, with X-RateLimit-* response headers
pub type UploadGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Seconds to replenish one request
    pub per_second: u64,
    /// Burst size (max requests that can be made immediately)
    pub burst_size: u32,
    /// Seconds between evictions of idle client entries
    pub cleanup_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: 2,
            burst_size: 5,
            cleanup_interval_secs: 60,
        }
    }
}

/// Build the governor config, or `None` when the quota is zero (limiting disabled).
///
/// Requires serving with `into_make_service_with_connect_info::<SocketAddr>()`
/// so the peer IP can be extracted.
pub fn create_governor_config(config: &RateLimitConfig) -> Option<Arc<UploadGovernorConfig>> {
    let governor = GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish();

    if governor.is_none() {
        warn!("Rate limiting disabled: invalid quota {:?}", config);
    }
    governor.map(Arc::new)
}

/// Periodically drop limiter state for clients that have gone idle.
///
/// Must be called from within a tokio runtime.
pub fn spawn_limiter_cleanup(governor: &UploadGovernorConfig, interval_secs: u64) -> tokio::task::JoinHandle<()> {
    let limiter = Arc::clone(governor.limiter());
    let period = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            limiter.retain_recent();
            debug!("Rate limiter tracking {} clients", limiter.len());
        }
    })
}
