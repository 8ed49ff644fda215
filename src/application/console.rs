use crate::config::ConsoleConfig;
use crate::domain::export::{ExportDraft, ExportFormat, ExportReceipt};
use crate::domain::pagination::{LoadBatch, PaginationState};
use crate::domain::ports::{ExporterBox, RequestStoreBox};
use crate::domain::query::{self, CriteriaUpdate, QueryCriteria, RequestPage};
use crate::domain::request::{PayoutRequest, PayoutStatus};
use crate::domain::selection::SelectionSet;
use crate::domain::stats::PayoutStats;
use crate::domain::transition::{PendingAction, TransitionReport};
use crate::error::{PayoutError, Result};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Screen state owned by the console. Only touched under `PayoutConsole::state`.
struct ScreenState {
    criteria: QueryCriteria,
    pagination: PaginationState,
    selection: SelectionSet,
    pending: PendingAction,
    export: ExportDraft,
    /// Bumped whenever a pending async result would no longer apply.
    epoch: u64,
    closed: bool,
    stats_cache: Option<(u64, PayoutStats)>,
}

/// Marks an async operation as running; clears the flag when dropped, even if
/// the caller abandons the future mid-delay.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, operation: &'static str) -> Result<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            warn!(operation, "rejected while already in flight");
            return Err(PayoutError::OperationInFlight(operation));
        }
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LoadOutcome {
    Applied { current_page: usize },
    /// The criteria changed or the console closed while the load was pending.
    Discarded,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ExportOutcome {
    Delivered(ExportReceipt),
    /// The console closed before the package was handed off.
    Discarded,
}

/// Everything the payout queue renders at one point in time.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ConsoleView {
    pub visible: Vec<PayoutRequest>,
    pub stats: PayoutStats,
    pub has_more: bool,
    pub total_matching: usize,
    pub current_page: usize,
    pub selected: usize,
}

/// The payout review console.
///
/// Owns the request store and all screen state. Every mutation goes through
/// one of the operations below; there is no raw field access.
pub struct PayoutConsole {
    store: RequestStoreBox,
    exporter: ExporterBox,
    config: ConsoleConfig,
    state: Mutex<ScreenState>,
    loading: AtomicBool,
    exporting: AtomicBool,
}

impl PayoutConsole {
    /// Creates a new `PayoutConsole`.
    ///
    /// # Arguments
    ///
    /// * `store` - The authoritative payout request store.
    /// * `exporter` - Receives committed export packages.
    /// * `config` - Page size, simulated latencies and the processing date.
    pub fn new(store: RequestStoreBox, exporter: ExporterBox, config: ConsoleConfig) -> Self {
        let state = ScreenState {
            criteria: QueryCriteria::default(),
            pagination: PaginationState::new(config.page_size),
            selection: SelectionSet::new(),
            pending: PendingAction::None,
            export: ExportDraft::new(config.today),
            epoch: 0,
            closed: false,
            stats_cache: None,
        };
        Self {
            store,
            exporter,
            config,
            state: Mutex::new(state),
            loading: AtomicBool::new(false),
            exporting: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    async fn open_state(&self) -> Result<MutexGuard<'_, ScreenState>> {
        let state = self.state.lock().await;
        if state.closed {
            return Err(PayoutError::ConsoleClosed);
        }
        Ok(state)
    }

    async fn view_for(&self, criteria: &QueryCriteria) -> Result<Vec<PayoutRequest>> {
        let all = self.store.get_all().await?;
        Ok(query::ordered_view(&all, criteria))
    }

    // ---- reads ----

    pub async fn criteria(&self) -> QueryCriteria {
        self.state.lock().await.criteria.clone()
    }

    pub async fn pagination(&self) -> PaginationState {
        self.state.lock().await.pagination
    }

    pub async fn selection(&self) -> SelectionSet {
        self.state.lock().await.selection.clone()
    }

    pub async fn pending_action(&self) -> PendingAction {
        self.state.lock().await.pending.clone()
    }

    pub async fn export_draft(&self) -> ExportDraft {
        self.state.lock().await.export.clone()
    }

    /// The full filtered and sorted view under the current criteria.
    pub async fn ordered_view(&self) -> Result<Vec<PayoutRequest>> {
        let criteria = self.criteria().await;
        self.view_for(&criteria).await
    }

    /// Stats over the whole store, memoized on the store version.
    pub async fn stats(&self) -> Result<PayoutStats> {
        let mut state = self.state.lock().await;
        let version = self.store.version().await?;
        if let Some((cached_version, stats)) = &state.stats_cache
            && *cached_version == version
        {
            return Ok(stats.clone());
        }
        let all = self.store.get_all().await?;
        let stats = PayoutStats::compute(&all, self.config.today)?;
        state.stats_cache = Some((version, stats.clone()));
        Ok(stats)
    }

    pub async fn view(&self) -> Result<ConsoleView> {
        let stats = self.stats().await?;
        let state = self.state.lock().await;
        let ordered = self.view_for(&state.criteria).await?;
        Ok(ConsoleView {
            visible: state.pagination.visible_slice(&ordered).to_vec(),
            stats,
            has_more: state.pagination.has_more(&ordered),
            total_matching: ordered.len(),
            current_page: state.pagination.current_page(),
            selected: state.selection.len(),
        })
    }

    /// Evaluates arbitrary criteria and pagination against the live store
    /// without touching the console's own screen state.
    pub async fn get_requests(
        &self,
        criteria: &QueryCriteria,
        pagination: &PaginationState,
    ) -> Result<RequestPage> {
        let all = self.store.get_all().await?;
        query::get_requests(&all, criteria, pagination, self.config.today)
    }

    // ---- criteria & pagination ----

    /// Applies a partial criteria change. Any actual change resets pagination
    /// to the first page and invalidates pending loads.
    pub async fn update_criteria(&self, update: CriteriaUpdate) -> Result<bool> {
        let mut state = self.open_state().await?;
        let changed = state.criteria.apply(update);
        if changed {
            state.pagination.reset();
            state.epoch += 1;
            debug!(criteria = ?state.criteria, "criteria updated, pagination reset");
        }
        Ok(changed)
    }

    /// Reveals `batch` more pages after the simulated load delay.
    pub async fn load_more(&self, batch: LoadBatch) -> Result<LoadOutcome> {
        self.advance(Advance::By(batch)).await
    }

    /// Reveals the whole ordered view after the simulated load delay.
    pub async fn jump_to_end(&self) -> Result<LoadOutcome> {
        self.advance(Advance::ToEnd).await
    }

    async fn advance(&self, advance: Advance) -> Result<LoadOutcome> {
        let _in_flight = InFlight::acquire(&self.loading, "load more")?;
        let epoch = self.open_state().await?.epoch;

        tokio::time::sleep(self.config.load_latency).await;

        let mut state = self.state.lock().await;
        if state.closed || state.epoch != epoch {
            debug!(?advance, "stale load discarded");
            return Ok(LoadOutcome::Discarded);
        }
        match advance {
            Advance::By(batch) => state.pagination.advance(batch),
            Advance::ToEnd => {
                let len = self.view_for(&state.criteria).await?.len();
                state.pagination.jump_to_end(len);
            }
        }
        let current_page = state.pagination.current_page();
        debug!(?advance, current_page, "pagination advanced");
        Ok(LoadOutcome::Applied { current_page })
    }

    // ---- selection ----

    /// Flips selection of `id`. Unknown ids are ignored.
    ///
    /// Returns whether `id` is selected afterwards.
    pub async fn toggle(&self, id: &str) -> Result<bool> {
        let mut state = self.open_state().await?;
        if !self.store.contains(id).await? {
            debug!(id, "ignoring selection of unknown payout request");
            return Ok(false);
        }
        Ok(state.selection.toggle(id))
    }

    /// Selects exactly the ids of the current ordered view (not just the
    /// revealed page). Returns the new selection size.
    pub async fn select_all(&self) -> Result<usize> {
        let mut state = self.open_state().await?;
        let ordered = self.view_for(&state.criteria).await?;
        state.selection.select_all(&ordered);
        debug!(selected = state.selection.len(), "selected all in view");
        Ok(state.selection.len())
    }

    pub async fn clear_selection(&self) -> Result<()> {
        self.open_state().await?.selection.clear();
        Ok(())
    }

    // ---- two-phase transitions ----

    async fn stage(&self, action: PendingAction) -> Result<()> {
        let mut state = self.open_state().await?;
        stage_locked(&mut state, action);
        Ok(())
    }

    async fn ensure_exists(&self, id: &str) -> Result<()> {
        if self.store.contains(id).await? {
            Ok(())
        } else {
            Err(PayoutError::NotFound(id.to_string()))
        }
    }

    /// Stages approval of `id`; nothing changes until [`confirm`](Self::confirm).
    pub async fn request_approve(&self, id: &str) -> Result<()> {
        self.ensure_exists(id).await?;
        self.stage(PendingAction::ConfirmApprove(id.to_string()))
            .await
    }

    /// Stages rejection of `id`; nothing changes until [`confirm`](Self::confirm).
    pub async fn request_reject(&self, id: &str) -> Result<()> {
        self.ensure_exists(id).await?;
        self.stage(PendingAction::ConfirmReject(id.to_string())).await
    }

    /// Stages approval of every selected id. Returns the selection size.
    pub async fn request_bulk_approve(&self) -> Result<usize> {
        let mut state = self.open_state().await?;
        if state.selection.is_empty() {
            return Err(PayoutError::EmptySelection);
        }
        stage_locked(&mut state, PendingAction::ConfirmBulkApprove);
        Ok(state.selection.len())
    }

    /// Commits the staged transition.
    ///
    /// The staged action is consumed even when the commit fails. Bulk approve
    /// skips ids that are no longer pending and always clears the selection.
    pub async fn confirm(&self) -> Result<TransitionReport> {
        let mut state = self.open_state().await?;
        let action = std::mem::take(&mut state.pending);

        let report = match action {
            PendingAction::None => return Err(PayoutError::NothingToConfirm),
            PendingAction::ExportDialog => {
                state.pending = PendingAction::ExportDialog;
                return Err(PayoutError::NothingToConfirm);
            }
            PendingAction::ConfirmApprove(id) => {
                self.commit_single(&id, PayoutStatus::Approved).await?
            }
            PendingAction::ConfirmReject(id) => {
                self.commit_single(&id, PayoutStatus::Rejected).await?
            }
            PendingAction::ConfirmBulkApprove => {
                let ids = state.selection.ids();
                let report = self
                    .store
                    .apply_bulk_transition(&ids, PayoutStatus::Approved)
                    .await?;
                state.selection.clear();
                for skipped in &report.skipped {
                    warn!(id = %skipped.id, reason = ?skipped.reason, "bulk approve skipped request");
                }
                report
            }
        };

        info!(
            target_status = %report.target,
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "transition committed"
        );
        Ok(report)
    }

    async fn commit_single(&self, id: &str, to: PayoutStatus) -> Result<TransitionReport> {
        self.store
            .apply_transition(id, to)
            .await
            .inspect_err(|e| warn!(id, error = %e, "transition refused"))?;
        let mut report = TransitionReport::new(to);
        report.applied.push(id.to_string());
        Ok(report)
    }

    /// Drops the staged action without touching the store.
    pub async fn cancel(&self) -> PendingAction {
        let mut state = self.state.lock().await;
        let cancelled = std::mem::take(&mut state.pending);
        debug!(?cancelled, "staged action cancelled");
        cancelled
    }

    // ---- export ----

    /// Opens the export dialog with the current draft.
    pub async fn open_export_dialog(&self) -> Result<ExportDraft> {
        self.stage(PendingAction::ExportDialog).await?;
        Ok(self.export_draft().await)
    }

    pub async fn set_export_format(&self, format: ExportFormat) -> Result<()> {
        self.open_state().await?.export.set_format(format);
        Ok(())
    }

    pub async fn set_export_filename(&self, filename: &str) -> Result<()> {
        self.open_state().await?.export.set_filename(filename);
        Ok(())
    }

    /// Sets format and filename in one step and opens the dialog.
    pub async fn prepare_export(&self, format: ExportFormat, filename: &str) -> Result<()> {
        {
            let mut state = self.open_state().await?;
            state.export.set_format(format);
            state.export.set_filename(filename);
        }
        self.stage(PendingAction::ExportDialog).await
    }

    /// Snapshots the ordered view and hands it to the exporter after the
    /// simulated delay.
    ///
    /// Fails with `EmptyExportFilename` before anything is scheduled when the
    /// filename is blank.
    pub async fn commit_export(&self) -> Result<ExportOutcome> {
        let _in_flight = InFlight::acquire(&self.exporting, "export")?;
        let package = {
            let state = self.open_state().await?;
            let records = self.view_for(&state.criteria).await?;
            state
                .export
                .package(records)
                .inspect_err(|e| warn!(error = %e, "export refused"))?
        };

        tokio::time::sleep(self.config.export_latency).await;

        if self.state.lock().await.closed {
            debug!(filename = %package.filename, "export discarded after close");
            return Ok(ExportOutcome::Discarded);
        }

        let receipt = self.exporter.export(package).await?;
        info!(
            location = %receipt.location.display(),
            records = receipt.record_count,
            "export delivered"
        );

        let mut state = self.state.lock().await;
        if state.pending == PendingAction::ExportDialog {
            state.pending = PendingAction::None;
        }
        Ok(ExportOutcome::Delivered(receipt))
    }

    /// Tears the console down. Pending loads and exports complete as
    /// `Discarded`; later operations fail with `ConsoleClosed`.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        state.closed = true;
        state.epoch += 1;
        state.pending = PendingAction::None;
        info!("payout console closed");
    }
}

/// Replaces the staged action. Callers already hold the state lock.
fn stage_locked(state: &mut ScreenState, action: PendingAction) {
    if !state.pending.is_none() {
        debug!(replaced = ?state.pending, "replacing staged action");
    }
    debug!(?action, selected = state.selection.len(), "action staged");
    state.pending = action;
}

#[derive(Debug, Clone, Copy)]
enum Advance {
    By(LoadBatch),
    ToEnd,
}
