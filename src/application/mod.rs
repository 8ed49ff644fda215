//! Application layer containing the payout console orchestration.
//!
//! `PayoutConsole` owns the request store and all screen state (criteria,
//! pagination, selection, the staged confirmation and the export draft). It
//! is the only way callers mutate any of it.

pub mod console;
