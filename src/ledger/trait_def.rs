//! SaleLedger and DailyStatsLedger trait definitions.

use super::models::{
    DailyStat, IncrementReport, PayoutStatus, Sale, SaleDraft, SaleWithParties, StatsField,
    StatsRange,
};
use crate::error::{EntityId, MarketResult};

/// Append-mostly record of completed purchases.
///
/// Operations return [`crate::error::MarketError`] because conflicts are part
/// of the contract: recording a sale for a (song, buyer) pair that already
/// has one fails with `DuplicateSale` carrying the existing row.
pub trait SaleLedger: Send + Sync {
    /// Records a sale. The duplicate-purchase guard is enforced by the store
    /// itself, so two concurrent calls for the same pair cannot both succeed.
    fn record_sale(&self, draft: SaleDraft) -> MarketResult<Sale>;

    fn get_sale(&self, id: EntityId) -> MarketResult<Option<Sale>>;

    /// The sale for a (song, buyer) pair, if one exists.
    fn sale_for(&self, song_id: EntityId, buyer_id: EntityId) -> MarketResult<Option<Sale>>;

    /// Sales where this user was the seller, newest first.
    fn sales_for_seller(&self, seller_id: EntityId) -> MarketResult<Vec<Sale>>;

    /// Sales where this user was the buyer, newest first.
    fn sales_for_buyer(&self, buyer_id: EntityId) -> MarketResult<Vec<Sale>>;

    /// All sales with party display names, newest first, optionally filtered
    /// by payout status.
    fn list_sales(&self, payout_filter: Option<PayoutStatus>) -> MarketResult<Vec<SaleWithParties>>;

    /// Moves a pending sale to a new payout status. `Paid` stamps the payout
    /// date, any other target clears it. Terminal states cannot be left.
    fn update_payout_status(&self, sale_id: EntityId, status: PayoutStatus) -> MarketResult<Sale>;
}

/// Per-user, per-UTC-day counters (downloads, purchases, revenue).
pub trait DailyStatsLedger: Send + Sync {
    /// Atomically adds `amount` to today's counter for each listed user.
    /// Unknown user ids are skipped and reported, not fatal.
    fn increment_stats(
        &self,
        user_ids: &[EntityId],
        field: StatsField,
        amount: f64,
    ) -> MarketResult<IncrementReport>;

    /// Day rows for a user within the range, oldest first.
    fn stats_for_user(&self, user_id: EntityId, range: StatsRange) -> MarketResult<Vec<DailyStat>>;

    /// Deletes rows older than `retention_days` before today. Returns the
    /// number of rows removed.
    fn prune_stats(&self, retention_days: u32) -> MarketResult<usize>;
}
