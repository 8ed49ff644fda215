use crate::domain::export::{ExportPackage, ExportReceipt};
use crate::domain::ports::{Exporter, RequestStore};
use crate::domain::request::{PayoutRequest, PayoutStatus};
use crate::domain::transition::{SkipReason, TransitionReport};
use crate::error::{PayoutError, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Requests {
    by_id: IndexMap<String, PayoutRequest>,
    version: u64,
}

/// A thread-safe in-memory payout request store.
///
/// Keeps requests in insertion order, which is the base order the query
/// pipeline's stable sort preserves for ties.
#[derive(Default, Clone)]
pub struct InMemoryRequestStore {
    inner: Arc<RwLock<Requests>>,
}

impl InMemoryRequestStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `requests`, rejecting invalid or duplicate ones.
    pub fn with_requests(requests: Vec<PayoutRequest>) -> Result<Self> {
        let mut by_id = IndexMap::with_capacity(requests.len());
        for request in requests {
            request.validate()?;
            if by_id.contains_key(&request.id) {
                return Err(PayoutError::DuplicateId(request.id));
            }
            by_id.insert(request.id.clone(), request);
        }
        Ok(Self {
            inner: Arc::new(RwLock::new(Requests { by_id, version: 0 })),
        })
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn get_all(&self) -> Result<Vec<PayoutRequest>> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<PayoutRequest>> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.get(id).cloned())
    }

    async fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.inner.read().await.by_id.contains_key(id))
    }

    async fn version(&self) -> Result<u64> {
        Ok(self.inner.read().await.version)
    }

    async fn apply_transition(&self, id: &str, to: PayoutStatus) -> Result<PayoutRequest> {
        let mut inner = self.inner.write().await;
        let request = inner
            .by_id
            .get_mut(id)
            .ok_or_else(|| PayoutError::NotFound(id.to_string()))?;

        if !request.status.can_transition_to(to) {
            return Err(PayoutError::InvalidTransition {
                id: id.to_string(),
                from: request.status,
                to,
            });
        }

        request.status = to;
        let updated = request.clone();
        inner.version += 1;
        Ok(updated)
    }

    async fn apply_bulk_transition(
        &self,
        ids: &[String],
        to: PayoutStatus,
    ) -> Result<TransitionReport> {
        let mut inner = self.inner.write().await;
        let mut report = TransitionReport::new(to);

        for id in ids {
            match inner.by_id.get_mut(id) {
                None => report.skip(id, SkipReason::NotFound),
                Some(request) if !request.status.can_transition_to(to) => {
                    report.skip(id, SkipReason::InvalidSource(request.status));
                }
                Some(request) => {
                    request.status = to;
                    report.applied.push(id.clone());
                }
            }
        }

        if !report.applied.is_empty() {
            inner.version += 1;
        }
        Ok(report)
    }
}

/// Exporter that keeps every package it receives, for tests and dry runs.
#[derive(Default, Clone)]
pub struct InMemoryExporter {
    packages: Arc<RwLock<Vec<ExportPackage>>>,
}

impl InMemoryExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn packages(&self) -> Vec<ExportPackage> {
        self.packages.read().await.clone()
    }
}

#[async_trait]
impl Exporter for InMemoryExporter {
    async fn export(&self, package: ExportPackage) -> Result<ExportReceipt> {
        let receipt = ExportReceipt {
            location: PathBuf::from(format!(
                "memory://{}.{}",
                package.filename,
                package.format.extension()
            )),
            record_count: package.records.len(),
        };
        self.packages.write().await.push(package);
        Ok(receipt)
    }
}
