use crate::domain::export::ExportFormat;
use crate::domain::request::PayoutStatus;
use thiserror::Error;

/// Errors surfaced by the payout console.
///
/// Every variant is recoverable: the failing operation leaves the store and
/// the console state consistent, and the caller decides how to surface it.
#[derive(Error, Debug)]
pub enum PayoutError {
    #[error("Invalid transition for {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: PayoutStatus,
        to: PayoutStatus,
    },
    #[error("Export filename must not be empty")]
    EmptyExportFilename,
    #[error("Payout request not found: {0}")]
    NotFound(String),
    #[error("Duplicate payout request id: {0}")]
    DuplicateId(String),
    #[error("No action is awaiting confirmation")]
    NothingToConfirm,
    #[error("No payout requests are selected")]
    EmptySelection,
    #[error("{0} is already in progress")]
    OperationInFlight(&'static str),
    #[error("The payout console has been closed")]
    ConsoleClosed,
    #[error("Export format {0} is not supported by this exporter")]
    UnsupportedExportFormat(ExportFormat),
    #[error("Payout totals overflow")]
    Overflow,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PayoutError>;
