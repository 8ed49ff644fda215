//! Domain layer: payout request types, the query pipeline and the ports the
//! application layer depends on.

pub mod export;
pub mod money;
pub mod pagination;
pub mod ports;
pub mod query;
pub mod request;
pub mod selection;
pub mod stats;
pub mod transition;
