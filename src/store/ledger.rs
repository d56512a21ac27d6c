//! SaleLedger and DailyStatsLedger implementations for [`SqliteMarketStore`].

use super::SqliteMarketStore;
use crate::error::{EntityId, MarketError, MarketResult};
use crate::ledger::{
    day_key, today_utc, DailyStat, DailyStatsLedger, FailedIncrement, IncrementReport,
    PayoutStatus, Sale, SaleDraft, SaleLedger, SaleWithParties, StatsField, StatsRange,
};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

const SALE_COLS: &str = "s.id, s.song_id, s.buyer_id, s.seller_id, s.gross_amount, \
     s.platform_fee, s.seller_earning, s.currency, s.exchange_rate, s.charge_id, \
     s.payment_intent_id, s.receipt_url, s.processor_details, s.payout_status, \
     s.payout_date, s.created";

fn sale_from_row(row: &rusqlite::Row) -> rusqlite::Result<Sale> {
    let status_str: String = row.get(13)?;
    let details_raw: Option<String> = row.get(12)?;
    let processor_details = match details_raw {
        Some(raw) => Some(serde_json::from_str(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                12,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?),
        None => None,
    };
    Ok(Sale {
        id: row.get(0)?,
        song_id: row.get(1)?,
        buyer_id: row.get(2)?,
        seller_id: row.get(3)?,
        gross_amount: row.get(4)?,
        platform_fee: row.get(5)?,
        seller_earning: row.get(6)?,
        currency: row.get(7)?,
        exchange_rate: row.get(8)?,
        charge_id: row.get(9)?,
        payment_intent_id: row.get(10)?,
        receipt_url: row.get(11)?,
        processor_details,
        payout_status: PayoutStatus::from_db_str(&status_str).unwrap_or(PayoutStatus::Pending),
        payout_date: row.get(14)?,
        created: row.get(15)?,
    })
}

fn load_sale(conn: &Connection, id: EntityId) -> MarketResult<Option<Sale>> {
    Ok(conn
        .query_row(
            &format!("SELECT {SALE_COLS} FROM sales s WHERE s.id = ?1"),
            params![id],
            sale_from_row,
        )
        .optional()?)
}

fn load_sale_for(
    conn: &Connection,
    song_id: EntityId,
    buyer_id: EntityId,
) -> MarketResult<Option<Sale>> {
    Ok(conn
        .query_row(
            &format!("SELECT {SALE_COLS} FROM sales s WHERE s.song_id = ?1 AND s.buyer_id = ?2"),
            params![song_id, buyer_id],
            sale_from_row,
        )
        .optional()?)
}

fn user_exists(conn: &Connection, id: EntityId) -> MarketResult<bool> {
    Ok(conn
        .query_row("SELECT 1 FROM users WHERE id = ?1", params![id], |_| {
            Ok(true)
        })
        .optional()?
        .unwrap_or(false))
}

fn validate_draft(draft: &SaleDraft) -> MarketResult<()> {
    if !draft.gross_amount.is_finite() || draft.gross_amount <= 0.0 {
        return Err(MarketError::validation(format!(
            "gross_amount must be positive, got {}",
            draft.gross_amount
        )));
    }
    for (name, value) in [
        ("platform_fee", draft.platform_fee),
        ("seller_earning", draft.seller_earning),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(MarketError::validation(format!(
                "{name} must be non-negative, got {value}"
            )));
        }
    }
    if draft.charge_id.trim().is_empty() {
        return Err(MarketError::validation("charge_id is empty"));
    }
    if draft.currency.trim().is_empty() {
        return Err(MarketError::validation("currency is empty"));
    }
    Ok(())
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl SaleLedger for SqliteMarketStore {
    fn record_sale(&self, draft: SaleDraft) -> MarketResult<Sale> {
        validate_draft(&draft)?;

        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();

        let song_exists: bool = conn
            .query_row(
                "SELECT 1 FROM songs WHERE id = ?1",
                params![draft.song_id],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if !song_exists {
            return Err(MarketError::not_found("song", draft.song_id));
        }
        if !user_exists(&conn, draft.buyer_id)? {
            return Err(MarketError::not_found("user", draft.buyer_id));
        }
        if !user_exists(&conn, draft.seller_id)? {
            return Err(MarketError::not_found("user", draft.seller_id));
        }

        let details_json = draft.processor_details.as_ref().map(|v| v.to_string());
        let inserted = conn.execute(
            "INSERT INTO sales (song_id, buyer_id, seller_id, gross_amount, platform_fee, \
             seller_earning, currency, exchange_rate, charge_id, payment_intent_id, \
             receipt_url, processor_details) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                draft.song_id,
                draft.buyer_id,
                draft.seller_id,
                draft.gross_amount,
                draft.platform_fee,
                draft.seller_earning,
                draft.currency.trim(),
                draft.exchange_rate,
                draft.charge_id.trim(),
                draft.payment_intent_id,
                draft.receipt_url,
                details_json,
            ],
        );
        match inserted {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                load_sale(&conn, id)?
                    .ok_or_else(|| MarketError::Store(anyhow::anyhow!("sale {id} vanished")))
            }
            Err(e) if is_constraint_violation(&e) => {
                // The (song, buyer) unique constraint: surface the existing
                // sale so the caller can show what the buyer already owns.
                match load_sale_for(&conn, draft.song_id, draft.buyer_id)? {
                    Some(existing) => Err(MarketError::DuplicateSale {
                        existing: Box::new(existing),
                    }),
                    None => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    fn get_sale(&self, id: EntityId) -> MarketResult<Option<Sale>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        load_sale(&conn, id)
    }

    fn sale_for(&self, song_id: EntityId, buyer_id: EntityId) -> MarketResult<Option<Sale>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        load_sale_for(&conn, song_id, buyer_id)
    }

    fn sales_for_seller(&self, seller_id: EntityId) -> MarketResult<Vec<Sale>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {SALE_COLS} FROM sales s WHERE s.seller_id = ?1 \
             ORDER BY s.created DESC, s.id DESC"
        ))?;
        let sales = stmt
            .query_map(params![seller_id], sale_from_row)?
            .collect::<std::result::Result<_, _>>()?;
        Ok(sales)
    }

    fn sales_for_buyer(&self, buyer_id: EntityId) -> MarketResult<Vec<Sale>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {SALE_COLS} FROM sales s WHERE s.buyer_id = ?1 \
             ORDER BY s.created DESC, s.id DESC"
        ))?;
        let sales = stmt
            .query_map(params![buyer_id], sale_from_row)?
            .collect::<std::result::Result<_, _>>()?;
        Ok(sales)
    }

    fn list_sales(
        &self,
        payout_filter: Option<PayoutStatus>,
    ) -> MarketResult<Vec<SaleWithParties>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        let base = format!(
            "SELECT {SALE_COLS}, so.title, b.full_name, se.full_name FROM sales s \
             JOIN songs so ON so.id = s.song_id \
             JOIN users b ON b.id = s.buyer_id \
             JOIN users se ON se.id = s.seller_id"
        );
        let map_row = |row: &rusqlite::Row| -> rusqlite::Result<SaleWithParties> {
            Ok(SaleWithParties {
                sale: sale_from_row(row)?,
                song_title: row.get(16)?,
                buyer_name: row.get(17)?,
                seller_name: row.get(18)?,
            })
        };
        let sales = match payout_filter {
            Some(status) => {
                let mut stmt = conn.prepare_cached(&format!(
                    "{base} WHERE s.payout_status = ?1 ORDER BY s.created DESC, s.id DESC"
                ))?;
                let rows = stmt
                    .query_map(params![status.to_db_str()], map_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt =
                    conn.prepare_cached(&format!("{base} ORDER BY s.created DESC, s.id DESC"))?;
                let rows = stmt
                    .query_map([], map_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(sales)
    }

    fn update_payout_status(
        &self,
        sale_id: EntityId,
        status: PayoutStatus,
    ) -> MarketResult<Sale> {
        let write_conn = self.write_conn();
        let mut conn = write_conn.lock().unwrap();
        let tx = conn.transaction()?;

        let current =
            load_sale(&tx, sale_id)?.ok_or_else(|| MarketError::not_found("sale", sale_id))?;
        if current.payout_status.is_terminal() {
            return Err(MarketError::validation(format!(
                "sale {sale_id} payout is already {}, which is terminal",
                current.payout_status.to_db_str()
            )));
        }

        if status == PayoutStatus::Paid {
            tx.execute(
                "UPDATE sales SET payout_status = ?1, \
                 payout_date = (cast(strftime('%s','now') as int)) WHERE id = ?2",
                params![status.to_db_str(), sale_id],
            )?;
        } else {
            tx.execute(
                "UPDATE sales SET payout_status = ?1, payout_date = NULL WHERE id = ?2",
                params![status.to_db_str(), sale_id],
            )?;
        }
        let updated = load_sale(&tx, sale_id)?
            .ok_or_else(|| MarketError::Store(anyhow::anyhow!("sale {sale_id} vanished")))?;
        tx.commit()?;
        Ok(updated)
    }
}

impl DailyStatsLedger for SqliteMarketStore {
    fn increment_stats(
        &self,
        user_ids: &[EntityId],
        field: StatsField,
        amount: f64,
    ) -> MarketResult<IncrementReport> {
        if user_ids.is_empty() {
            return Err(MarketError::validation("no users to credit"));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(MarketError::validation(format!(
                "increment amount must be positive, got {amount}"
            )));
        }
        if field != StatsField::Revenue && amount.fract() != 0.0 {
            return Err(MarketError::validation(format!(
                "{} increment must be a whole number, got {amount}",
                field.column()
            )));
        }

        let day = day_key(today_utc());
        let column = field.column();
        let sql = format!(
            "INSERT INTO daily_stats (user_id, day, {column}) VALUES (?1, ?2, ?3) \
             ON CONFLICT (user_id, day) DO UPDATE SET {column} = {column} + excluded.{column}"
        );

        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        let mut report = IncrementReport::default();
        for &user_id in user_ids {
            if !user_exists(&conn, user_id)? {
                debug!(user_id, column, "Skipping stats increment for unknown user");
                report.failed.push(FailedIncrement {
                    user_id,
                    reason: "unknown user".to_string(),
                });
                continue;
            }
            if field == StatsField::Revenue {
                conn.execute(&sql, params![user_id, day, amount])?;
            } else {
                conn.execute(&sql, params![user_id, day, amount as i64])?;
            }
            report.applied.push(user_id);
        }
        Ok(report)
    }

    fn stats_for_user(
        &self,
        user_id: EntityId,
        range: StatsRange,
    ) -> MarketResult<Vec<DailyStat>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        let map_row = |row: &rusqlite::Row| -> rusqlite::Result<DailyStat> {
            Ok(DailyStat {
                user_id: row.get(0)?,
                day: row.get(1)?,
                downloads: row.get(2)?,
                purchases: row.get(3)?,
                revenue: row.get(4)?,
            })
        };
        let stats = match range.start_day(today_utc()) {
            Some(start) => {
                let mut stmt = conn.prepare_cached(
                    "SELECT user_id, day, downloads, purchases, revenue FROM daily_stats \
                     WHERE user_id = ?1 AND day >= ?2 ORDER BY day",
                )?;
                let rows = stmt
                    .query_map(params![user_id, start], map_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare_cached(
                    "SELECT user_id, day, downloads, purchases, revenue FROM daily_stats \
                     WHERE user_id = ?1 ORDER BY day",
                )?;
                let rows = stmt
                    .query_map(params![user_id], map_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(stats)
    }

    fn prune_stats(&self, retention_days: u32) -> MarketResult<usize> {
        if retention_days == 0 {
            return Ok(0);
        }
        let cutoff = day_key(today_utc() - chrono::Days::new(retention_days as u64));
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM daily_stats WHERE day < ?1", params![cutoff])?;
        Ok(deleted)
    }
}
