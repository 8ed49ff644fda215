use super::export::{ExportPackage, ExportReceipt};
use super::request::{PayoutRequest, PayoutStatus};
use super::transition::TransitionReport;
use crate::error::Result;
use async_trait::async_trait;

/// Authoritative collection of payout requests.
///
/// Every call is atomic: readers never observe a half-applied transition.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// All requests in store order.
    async fn get_all(&self) -> Result<Vec<PayoutRequest>>;
    async fn get(&self, id: &str) -> Result<Option<PayoutRequest>>;
    async fn contains(&self, id: &str) -> Result<bool>;
    /// Bumped on every successful mutation.
    async fn version(&self) -> Result<u64>;
    async fn apply_transition(&self, id: &str, to: PayoutStatus) -> Result<PayoutRequest>;
    /// Validates each id on its own; invalid ones are reported, not applied.
    async fn apply_bulk_transition(
        &self,
        ids: &[String],
        to: PayoutStatus,
    ) -> Result<TransitionReport>;
}

/// Turns an export package into a file or upload somewhere outside the engine.
#[async_trait]
pub trait Exporter: Send + Sync {
    async fn export(&self, package: ExportPackage) -> Result<ExportReceipt>;
}

pub type RequestStoreBox = Box<dyn RequestStore>;
pub type ExporterBox = Box<dyn Exporter>;
