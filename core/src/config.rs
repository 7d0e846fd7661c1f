//! Engine configuration.
//!
//! Configuration is passed explicitly into constructors; nothing in the
//! engine reads ambient global state.

use std::time::Duration;

/// Rate limiter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Fixed window length.
    ///
    /// Default: 60 seconds
    pub window: Duration,

    /// Maximum requests per window per key (claimant or origin).
    ///
    /// Default: 10
    pub max_requests: u32,
}

impl RateLimitConfig {
    /// Create a rate limit configuration.
    #[must_use]
    pub const fn new(window: Duration, max_requests: u32) -> Self {
        Self { window, max_requests }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_requests: 10,
        }
    }
}

/// Detail cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live of a cached item snapshot.
    ///
    /// Default: 3600 seconds
    pub detail_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            detail_ttl: Duration::from_secs(3600),
        }
    }
}

/// Configuration for the issuance engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Rate limiter settings.
    pub rate_limit: RateLimitConfig,

    /// Detail cache settings.
    pub cache: CacheConfig,

    /// Whether the item's own application window also gates issuance.
    ///
    /// By default only the owning event's window and active flag gate a
    /// claim; the item window is display metadata. Deployments that want
    /// per-item windows enforced flip this on.
    ///
    /// Default: `false`
    pub gate_on_item_window: bool,
}

impl EngineConfig {
    /// Create a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rate limiter window and maximum.
    #[must_use]
    pub const fn with_rate_limit(mut self, window: Duration, max_requests: u32) -> Self {
        self.rate_limit = RateLimitConfig::new(window, max_requests);
        self
    }

    /// Set the detail cache TTL.
    #[must_use]
    pub const fn with_detail_ttl(mut self, ttl: Duration) -> Self {
        self.cache.detail_ttl = ttl;
        self
    }

    /// Enable or disable item-window gating.
    #[must_use]
    pub const fn with_item_window_gating(mut self, enabled: bool) -> Self {
        self.gate_on_item_window = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            cache: CacheConfig::default(),
            gate_on_item_window: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.cache.detail_ttl, Duration::from_secs(3600));
        assert!(!config.gate_on_item_window);
    }

    #[test]
    fn builder_overrides() {
        let config = EngineConfig::new()
            .with_rate_limit(Duration::from_secs(5), 2)
            .with_detail_ttl(Duration::from_secs(30))
            .with_item_window_gating(true);

        assert_eq!(config.rate_limit.window, Duration::from_secs(5));
        assert_eq!(config.rate_limit.max_requests, 2);
        assert_eq!(config.cache.detail_ttl, Duration::from_secs(30));
        assert!(config.gate_on_item_window);
    }
}
