use super::request::PayoutStatus;
use serde::Serialize;

/// The one thing the console is waiting on the operator for.
///
/// Staging a new action replaces whatever was staged before.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum PendingAction {
    #[default]
    None,
    ConfirmApprove(String),
    ConfirmReject(String),
    ConfirmBulkApprove,
    ExportDialog,
}

impl PendingAction {
    pub fn is_none(&self) -> bool {
        matches!(self, PendingAction::None)
    }
}

/// Why one id of a transition batch was left untouched.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub enum SkipReason {
    NotFound,
    InvalidSource(PayoutStatus),
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct SkippedTransition {
    pub id: String,
    pub reason: SkipReason,
}

/// Outcome of a committed transition, single or bulk.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct TransitionReport {
    pub target: PayoutStatus,
    pub applied: Vec<String>,
    pub skipped: Vec<SkippedTransition>,
}

impl TransitionReport {
    pub fn new(target: PayoutStatus) -> Self {
        Self {
            target,
            applied: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn skip(&mut self, id: &str, reason: SkipReason) {
        self.skipped.push(SkippedTransition {
            id: id.to_string(),
            reason,
        });
    }
}
