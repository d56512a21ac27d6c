//! Shared fixtures for integration tests.

#![allow(dead_code)]

use tempfile::TempDir;
use tunemart::catalog::{CatalogStore, Genre, NewSong, Song};
use tunemart::ledger::PurchaseRequest;
use tunemart::user::{UserAccount, UserDraft, UserRole, UserStore};
use tunemart::{EntityId, SqliteMarketStore};

/// A market store on a throwaway database file.
pub struct TestMarket {
    pub store: SqliteMarketStore,
    _tmp: TempDir,
}

impl TestMarket {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let store = SqliteMarketStore::open(tmp.path().join("market.db"), 2).unwrap();
        TestMarket { store, _tmp: tmp }
    }

    pub fn artist(&self, name: &str) -> UserAccount {
        let user = self
            .store
            .create_user(UserDraft {
                full_name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                role: UserRole::Artist,
            })
            .unwrap();
        self.store.set_verified(user.id, true).unwrap();
        self.store.get_user(user.id).unwrap().unwrap()
    }

    pub fn listener(&self, name: &str) -> UserAccount {
        self.store
            .create_user(UserDraft {
                full_name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                role: UserRole::Listener,
            })
            .unwrap()
    }

    pub fn genre(&self, name: &str) -> Genre {
        self.store.create_genre(name).unwrap()
    }

    pub fn song(&self, title: &str, artist_ids: Vec<EntityId>, genre_id: EntityId) -> Song {
        self.store
            .create_song(NewSong {
                title: title.to_string(),
                artist_ids,
                album_id: None,
                genre_id,
                duration_secs: 200,
                price: 0.99,
                free_download: false,
                is_published: true,
                cover_image_url: None,
                audio_url: format!("audio/{title}"),
                audio_url_high: None,
            })
            .unwrap()
    }

    pub fn free_song(&self, title: &str, artist_ids: Vec<EntityId>, genre_id: EntityId) -> Song {
        self.store
            .create_song(NewSong {
                title: title.to_string(),
                artist_ids,
                album_id: None,
                genre_id,
                duration_secs: 200,
                price: 0.0,
                free_download: true,
                is_published: true,
                cover_image_url: None,
                audio_url: format!("audio/{title}"),
                audio_url_high: None,
            })
            .unwrap()
    }
}

pub fn purchase(song_id: EntityId, buyer_id: EntityId, seller_id: EntityId) -> PurchaseRequest {
    PurchaseRequest {
        song_id,
        buyer_id,
        seller_id,
        gross_amount: 0.99,
        platform_fee: 0.30,
        seller_earning: 0.69,
        currency: None,
        exchange_rate: None,
        charge_id: format!("ch_{song_id}_{buyer_id}"),
        payment_intent_id: None,
        receipt_url: None,
        processor_details: None,
    }
}
