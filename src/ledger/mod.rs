//! Sale ledger and daily stats ledger.

mod models;
mod purchase;
mod seller_stats;
mod trait_def;

pub use models::{
    day_key, today_utc, DailyStat, FailedIncrement, IncrementReport, PayoutStatus, Sale,
    SaleDraft, SaleWithParties, StatsField, StatsRange,
};
pub use purchase::{record_download, record_purchase, PurchaseOutcome, PurchaseRequest};
pub use seller_stats::{ActiveSeller, SellerStats, SellerStatsAggregator, SongSales};
pub use trait_def::{DailyStatsLedger, SaleLedger};
