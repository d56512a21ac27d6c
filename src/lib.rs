//! Core domain logic for a music marketplace backend: catalog and views,
//! sale ledger with a duplicate-purchase guard, per-day stats ledger and
//! seller dashboards, all backed by a single SQLite database.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod sqlite_persistence;
pub mod store;
pub mod user;
pub mod views;

pub use error::{EntityId, MarketError, MarketResult};
pub use store::SqliteMarketStore;
