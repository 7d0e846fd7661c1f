//! Application state shared with all handlers.

use flashdrop_engine::providers::ActivationFlags as _;
use flashdrop_engine::stores::{
    RedisActivationFlags, RedisDetailCache, RedisRateLimiter, RedisStockLedger,
};
use flashdrop_engine::{ActivationService, Issuer};
use flashdrop_postgres::{PostgresCatalog, PostgresClaimRepository};

/// The production orchestrator: PostgreSQL system-of-record, Redis fast
/// path.
pub type ProdIssuer = Issuer<
    PostgresCatalog,
    PostgresClaimRepository,
    RedisStockLedger,
    RedisRateLimiter,
    RedisActivationFlags,
    RedisDetailCache,
>;

/// The production activation service.
pub type ProdActivation =
    ActivationService<PostgresCatalog, RedisStockLedger, RedisActivationFlags>;

/// Shared application state.
///
/// Everything here is cheap to clone: the stores share one Redis
/// connection manager and the repositories share one pool.
#[derive(Clone)]
pub struct AppState {
    /// The claim orchestrator.
    pub issuer: ProdIssuer,
    /// Administrative event activation.
    pub activation: ProdActivation,
    /// Catalog reads for the listing endpoints.
    pub catalog: PostgresCatalog,
    /// Claim reads for the profile endpoint.
    pub claims: PostgresClaimRepository,
    /// Activation flags, read by the item status endpoint.
    pub flags: RedisActivationFlags,
}

impl AppState {
    /// Convenience pass-through used by the item detail handler.
    ///
    /// # Errors
    ///
    /// Propagates store failures from the flag reads.
    pub async fn item_flags(
        &self,
        event_id: flashdrop_core::EventId,
        item_id: flashdrop_core::ItemId,
    ) -> flashdrop_core::error::Result<(bool, bool)> {
        let event_active = self.flags.is_event_active(event_id).await?;
        let item_active = self.flags.is_item_active(item_id).await?;
        Ok((event_active, item_active))
    }
}
