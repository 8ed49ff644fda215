//! CSV adapters for loading payout requests and writing export snapshots.

pub mod request_reader;
pub mod request_writer;
