//! Adapters behind the domain ports: the in-memory store, exporters and the
//! reference dataset.

pub mod file_exporter;
pub mod in_memory;
pub mod seed;
