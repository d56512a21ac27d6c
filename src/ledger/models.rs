use crate::error::EntityId;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Payout lifecycle of a sale. `Pending` is the only non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Paid,
    Rejected,
}

impl PayoutStatus {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PayoutStatus::Pending),
            "paid" => Some(PayoutStatus::Paid),
            "rejected" => Some(PayoutStatus::Rejected),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Paid => "paid",
            PayoutStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self != PayoutStatus::Pending
    }
}

/// A recorded sale. Monetary amounts and processor fields are persisted
/// exactly as the payment collaborator reported them; this ledger never
/// recomputes splits or fees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: EntityId,
    pub song_id: EntityId,
    pub buyer_id: EntityId,
    pub seller_id: EntityId,
    pub gross_amount: f64,
    pub platform_fee: f64,
    pub seller_earning: f64,
    pub currency: String,
    pub exchange_rate: Option<f64>,
    /// Payment processor charge id, unique per charge.
    pub charge_id: String,
    pub payment_intent_id: Option<String>,
    pub receipt_url: Option<String>,
    /// Opaque processor payload (fee breakdowns and the like), stored
    /// verbatim as JSON.
    pub processor_details: Option<serde_json::Value>,
    pub payout_status: PayoutStatus,
    /// Stamped when the payout transitions to `Paid`, cleared otherwise.
    pub payout_date: Option<i64>,
    pub created: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SaleDraft {
    pub song_id: EntityId,
    pub buyer_id: EntityId,
    pub seller_id: EntityId,
    pub gross_amount: f64,
    pub platform_fee: f64,
    pub seller_earning: f64,
    pub currency: String,
    pub exchange_rate: Option<f64>,
    pub charge_id: String,
    pub payment_intent_id: Option<String>,
    pub receipt_url: Option<String>,
    pub processor_details: Option<serde_json::Value>,
}

/// A sale joined with the display names an admin listing needs.
#[derive(Clone, Debug, Serialize)]
pub struct SaleWithParties {
    pub sale: Sale,
    pub song_title: String,
    pub buyer_name: String,
    pub seller_name: String,
}

/// Which per-day counter an increment targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatsField {
    Downloads,
    Purchases,
    Revenue,
}

impl StatsField {
    /// Column name in the daily stats table.
    pub fn column(&self) -> &'static str {
        match self {
            StatsField::Downloads => "downloads",
            StatsField::Purchases => "purchases",
            StatsField::Revenue => "revenue",
        }
    }
}

/// One user's counters for one UTC day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyStat {
    pub user_id: EntityId,
    /// Day key, `YYYYMMDD` in UTC.
    pub day: u32,
    pub downloads: i64,
    pub purchases: i64,
    pub revenue: f64,
}

/// Time window for stats queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatsRange {
    /// Last 7 UTC days, today inclusive.
    Weekly,
    /// Last 30 UTC days, today inclusive.
    Monthly,
    All,
}

impl StatsRange {
    /// First day key included in the range, or `None` for an unbounded query.
    pub fn start_day(&self, today: NaiveDate) -> Option<u32> {
        let days_back = match self {
            StatsRange::Weekly => 6,
            StatsRange::Monthly => 29,
            StatsRange::All => return None,
        };
        Some(day_key(today - chrono::Days::new(days_back)))
    }
}

/// Per-artist outcome of a multi-target stats increment. A song credited to
/// several artists increments each one independently; an unknown artist id
/// is reported here instead of failing the whole batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IncrementReport {
    pub applied: Vec<EntityId>,
    pub failed: Vec<FailedIncrement>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FailedIncrement {
    pub user_id: EntityId,
    pub reason: String,
}

impl IncrementReport {
    pub fn merge(&mut self, other: IncrementReport) {
        self.applied.extend(other.applied);
        self.failed.extend(other.failed);
    }
}

/// Encodes a date as a `YYYYMMDD` day key.
pub fn day_key(date: NaiveDate) -> u32 {
    date.year() as u32 * 10_000 + date.month() * 100 + date.day()
}

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_key_encoding() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(day_key(date), 20240307);
    }

    #[test]
    fn range_start_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(StatsRange::Weekly.start_day(today), Some(20240301));
        assert_eq!(StatsRange::Monthly.start_day(today), Some(20240207));
        assert_eq!(StatsRange::All.start_day(today), None);
    }

    #[test]
    fn weekly_range_crosses_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert_eq!(StatsRange::Weekly.start_day(today), Some(20240225));
    }

    #[test]
    fn payout_terminal_states() {
        assert!(!PayoutStatus::Pending.is_terminal());
        assert!(PayoutStatus::Paid.is_terminal());
        assert!(PayoutStatus::Rejected.is_terminal());
    }
}
