//! Error taxonomy shared by every marketplace operation.
//!
//! The HTTP layer maps these onto status codes: `Validation` -> 400,
//! `DuplicateSale` -> 409, `NotFound` -> 404, `Store` -> 500. Keeping the
//! kinds distinct here is what lets the caller render "already owned"
//! instead of a generic failure.

use crate::ledger::Sale;
use thiserror::Error;

/// Database rowid used as the public identifier for every entity.
pub type EntityId = i64;

#[derive(Debug, Error)]
pub enum MarketError {
    /// A required field is missing or malformed. Surfaced immediately, never
    /// retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// The (song, buyer) pair already has a sale on record. Carries the
    /// pre-existing sale so the caller can show it.
    #[error("song {} was already purchased by user {}", existing.song_id, existing.buyer_id)]
    DuplicateSale { existing: Box<Sale> },

    /// A well-formed id (or name) that resolves to nothing.
    #[error("{what} {key} not found")]
    NotFound { what: &'static str, key: String },

    /// The persistence layer failed. Logged and surfaced as-is; retries are
    /// the transport layer's business.
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl MarketError {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        MarketError::Validation(msg.into())
    }

    pub fn not_found<K: ToString>(what: &'static str, key: K) -> Self {
        MarketError::NotFound {
            what,
            key: key.to_string(),
        }
    }
}

impl From<rusqlite::Error> for MarketError {
    fn from(e: rusqlite::Error) -> Self {
        MarketError::Store(e.into())
    }
}

pub type MarketResult<T> = Result<T, MarketError>;

/// Parses an id received from the boundary layer.
///
/// A string that is not a positive integer is a client error (400-equivalent),
/// distinct from a well-formed id that matches no row (404-equivalent).
pub fn parse_id(raw: &str) -> MarketResult<EntityId> {
    let trimmed = raw.trim();
    match trimmed.parse::<EntityId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(MarketError::validation(format!("malformed id: {raw:?}"))),
    }
}
