//! Seller-facing sales aggregation.

use super::trait_def::SaleLedger;
use crate::catalog::CatalogStore;
use crate::error::{EntityId, MarketError, MarketResult};
use crate::user::UserStore;
use serde::Serialize;
use std::collections::HashMap;

/// Per-song sales breakdown within a seller's dashboard.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SongSales {
    pub song_id: EntityId,
    pub title: String,
    pub cover_image_url: Option<String>,
    pub sales_count: u64,
    /// Sum of the seller's earnings for this song, as recorded on each sale.
    pub earnings: f64,
}

/// A seller's aggregated dashboard numbers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SellerStats {
    pub total_songs_sold: u64,
    pub total_earnings: f64,
    pub songs: Vec<SongSales>,
}

impl SellerStats {
    fn empty() -> Self {
        Self {
            total_songs_sold: 0,
            total_earnings: 0.0,
            songs: Vec::new(),
        }
    }
}

/// One row of the active sellers listing.
#[derive(Clone, Debug, Serialize)]
pub struct ActiveSeller {
    pub user_id: EntityId,
    pub full_name: String,
    pub total_songs_sold: u64,
    pub total_earnings: f64,
}

/// Aggregates the sale ledger into seller dashboards.
#[derive(Clone)]
pub struct SellerStatsAggregator<S> {
    store: S,
}

impl<S> SellerStatsAggregator<S>
where
    S: SaleLedger + CatalogStore + UserStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Groups a seller's sales by song. A seller with no sales gets the
    /// all-zero result, which is a valid answer, not an error; an unknown
    /// seller id is `NotFound`.
    pub fn seller_stats(&self, seller_id: EntityId) -> MarketResult<SellerStats> {
        self.store
            .get_user(seller_id)?
            .ok_or_else(|| MarketError::not_found("user", seller_id))?;

        let sales = self.store.sales_for_seller(seller_id)?;
        if sales.is_empty() {
            return Ok(SellerStats::empty());
        }

        let mut by_song: HashMap<EntityId, SongSales> = HashMap::new();
        let mut order = Vec::new();
        for sale in &sales {
            let entry = match by_song.get_mut(&sale.song_id) {
                Some(entry) => entry,
                None => {
                    let (title, cover_image_url) = match self.store.get_song(sale.song_id)? {
                        Some(song) => (song.title, song.cover_image_url),
                        // The song row outlives deletion attempts while sales
                        // reference it, but tolerate a gap anyway.
                        None => (format!("song {}", sale.song_id), None),
                    };
                    order.push(sale.song_id);
                    by_song.entry(sale.song_id).or_insert(SongSales {
                        song_id: sale.song_id,
                        title,
                        cover_image_url,
                        sales_count: 0,
                        earnings: 0.0,
                    })
                }
            };
            entry.sales_count += 1;
            entry.earnings += sale.seller_earning;
        }

        let songs: Vec<SongSales> = order
            .into_iter()
            .filter_map(|id| by_song.remove(&id))
            .collect();
        let total_songs_sold = songs.iter().map(|s| s.sales_count).sum();
        let total_earnings = songs.iter().map(|s| s.earnings).sum();

        Ok(SellerStats {
            total_songs_sold,
            total_earnings,
            songs,
        })
    }

    /// Verified artists with their lifetime sales totals. Sellers without a
    /// single sale are included with zeros.
    pub fn active_sellers(&self) -> MarketResult<Vec<ActiveSeller>> {
        let mut sellers = Vec::new();
        for artist in self.store.verified_artists()? {
            let sales = self.store.sales_for_seller(artist.id)?;
            sellers.push(ActiveSeller {
                user_id: artist.id,
                full_name: artist.full_name,
                total_songs_sold: sales.len() as u64,
                total_earnings: sales.iter().map(|s| s.seller_earning).sum(),
            });
        }
        Ok(sellers)
    }
}
