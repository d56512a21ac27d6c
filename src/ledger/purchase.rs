//! Purchase orchestration.
//!
//! A purchase touches three places: the sale ledger (record of truth), the
//! buyer's purchased-songs cache (advisory) and the daily stats ledger
//! (best-effort). Only the ledger write can fail the purchase; once the sale
//! row exists the remaining steps degrade to warnings and are never rolled
//! back.

use super::models::{IncrementReport, Sale, SaleDraft, StatsField};
use super::trait_def::{DailyStatsLedger, SaleLedger};
use crate::catalog::CatalogStore;
use crate::error::{EntityId, MarketError, MarketResult};
use crate::user::UserStore;
use tracing::{info, warn};

/// A completed charge reported by the payment collaborator. Amounts arrive
/// pre-split; this module records them verbatim.
#[derive(Clone, Debug)]
pub struct PurchaseRequest {
    pub song_id: EntityId,
    pub buyer_id: EntityId,
    pub seller_id: EntityId,
    pub gross_amount: f64,
    pub platform_fee: f64,
    pub seller_earning: f64,
    /// Falls back to the configured default currency when absent.
    pub currency: Option<String>,
    pub exchange_rate: Option<f64>,
    pub charge_id: String,
    pub payment_intent_id: Option<String>,
    pub receipt_url: Option<String>,
    pub processor_details: Option<serde_json::Value>,
}

#[derive(Clone, Debug)]
pub struct PurchaseOutcome {
    pub sale: Sale,
    /// Whether the buyer's purchased-songs cache was appended.
    pub cache_updated: bool,
    /// Per-artist stats increments that were applied or skipped.
    pub stats: IncrementReport,
    /// Post-commit steps that failed. The sale stands regardless.
    pub warnings: Vec<String>,
}

/// Records a purchase end to end.
///
/// Fails with `DuplicateSale` when the buyer already owns the song and with
/// `NotFound` when any party is unknown. Stats are credited to every artist
/// on the song: one purchase count and the gross amount as revenue.
pub fn record_purchase<S>(
    store: &S,
    default_currency: &str,
    req: PurchaseRequest,
) -> MarketResult<PurchaseOutcome>
where
    S: CatalogStore + UserStore + SaleLedger + DailyStatsLedger,
{
    let song = store
        .get_song(req.song_id)?
        .ok_or_else(|| MarketError::not_found("song", req.song_id))?;

    let currency = match req.currency {
        Some(c) if !c.trim().is_empty() => c,
        _ => default_currency.to_string(),
    };
    let sale = store.record_sale(SaleDraft {
        song_id: req.song_id,
        buyer_id: req.buyer_id,
        seller_id: req.seller_id,
        gross_amount: req.gross_amount,
        platform_fee: req.platform_fee,
        seller_earning: req.seller_earning,
        currency,
        exchange_rate: req.exchange_rate,
        charge_id: req.charge_id,
        payment_intent_id: req.payment_intent_id,
        receipt_url: req.receipt_url,
        processor_details: req.processor_details,
    })?;
    info!(
        sale_id = sale.id,
        song_id = sale.song_id,
        buyer_id = sale.buyer_id,
        "Recorded sale"
    );

    let mut warnings = Vec::new();

    let cache_updated = match store.add_purchased_song(sale.buyer_id, sale.song_id) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                sale_id = sale.id,
                "Failed to update purchased-songs cache: {e:#}"
            );
            warnings.push(format!("purchased-songs cache update failed: {e:#}"));
            false
        }
    };

    let mut stats = IncrementReport::default();
    for (field, amount) in [
        (StatsField::Purchases, 1.0),
        (StatsField::Revenue, sale.gross_amount),
    ] {
        match store.increment_stats(&song.artist_ids, field, amount) {
            Ok(report) => stats.merge(report),
            Err(e) => {
                warn!(sale_id = sale.id, field = field.column(), "Stats increment failed: {e:#}");
                warnings.push(format!("{} stats increment failed: {e:#}", field.column()));
            }
        }
    }

    Ok(PurchaseOutcome {
        sale,
        cache_updated,
        stats,
        warnings,
    })
}

/// Records a song download: verifies the user may download it (free songs or
/// previously purchased ones) and credits a download to each of its artists.
pub fn record_download<S>(
    store: &S,
    song_id: EntityId,
    user_id: EntityId,
) -> MarketResult<IncrementReport>
where
    S: CatalogStore + UserStore + DailyStatsLedger,
{
    let song = store
        .get_song(song_id)?
        .ok_or_else(|| MarketError::not_found("song", song_id))?;
    if !song.free_download && !store.has_purchased(user_id, song_id)? {
        return Err(MarketError::validation(
            "song is neither free nor owned by this user",
        ));
    }
    store.increment_stats(&song.artist_ids, StatsField::Downloads, 1.0)
}
