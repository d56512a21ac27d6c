//! Catalog models for the SQLite-backed marketplace store.

use crate::error::EntityId;
use serde::{Deserialize, Serialize};

/// A published (or draft) song in the catalog.
///
/// `album_id` is the single source of truth for album membership; album song
/// lists are always derived by querying songs, never stored on the album.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: EntityId,
    pub title: String,
    /// Performing artists, in display order. Never empty.
    pub artist_ids: Vec<EntityId>,
    pub album_id: Option<EntityId>,
    pub genre_id: EntityId,
    /// Canonical duration in whole seconds.
    pub duration_secs: u32,
    pub price: f64,
    pub free_download: bool,
    pub plays: i64,
    pub is_published: bool,
    pub cover_image_url: Option<String>,
    pub audio_url: String,
    /// Optional higher-bitrate rendition.
    pub audio_url_high: Option<String>,
    /// Unix timestamp of row creation.
    pub created: i64,
}

/// Fields required to create a song. The duration arrives in whatever shape
/// the upstream transcoder reported and is normalized on write.
#[derive(Clone, Debug, Deserialize)]
pub struct SongDraft {
    pub title: String,
    pub artist_ids: Vec<EntityId>,
    pub album_id: Option<EntityId>,
    pub genre_id: EntityId,
    pub duration: RawDuration,
    pub price: f64,
    #[serde(default)]
    pub free_download: bool,
    #[serde(default = "default_true")]
    pub is_published: bool,
    pub cover_image_url: Option<String>,
    pub audio_url: String,
    pub audio_url_high: Option<String>,
}

fn default_true() -> bool {
    true
}

impl SongDraft {
    /// Validates the draft and normalizes its duration to canonical seconds.
    pub fn normalize(self) -> crate::error::MarketResult<NewSong> {
        use crate::error::MarketError;
        if self.title.trim().is_empty() {
            return Err(MarketError::validation("song title is empty"));
        }
        if self.artist_ids.is_empty() {
            return Err(MarketError::validation("song has no artists"));
        }
        Ok(NewSong {
            duration_secs: self.duration.into_secs()?,
            title: self.title,
            artist_ids: self.artist_ids,
            album_id: self.album_id,
            genre_id: self.genre_id,
            price: self.price,
            free_download: self.free_download,
            is_published: self.is_published,
            cover_image_url: self.cover_image_url,
            audio_url: self.audio_url,
            audio_url_high: self.audio_url_high,
        })
    }
}

/// A validated song ready for insertion, duration already canonical.
#[derive(Clone, Debug)]
pub struct NewSong {
    pub title: String,
    pub artist_ids: Vec<EntityId>,
    pub album_id: Option<EntityId>,
    pub genre_id: EntityId,
    pub duration_secs: u32,
    pub price: f64,
    pub free_download: bool,
    pub is_published: bool,
    pub cover_image_url: Option<String>,
    pub audio_url: String,
    pub audio_url_high: Option<String>,
}

/// Duration as reported by upstream tooling. Some encoders report a numeric
/// second count, others an "MM:SS" string. See [`crate::catalog::duration`].
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Seconds(f64),
    Text(String),
}

/// Partial update for a song. `None` fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SongPatch {
    pub title: Option<String>,
    pub genre_id: Option<EntityId>,
    pub price: Option<f64>,
    pub is_published: Option<bool>,
    pub cover_image_url: Option<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: EntityId,
    pub title: String,
    pub artist_id: EntityId,
    pub genre_id: EntityId,
    pub cover_image_url: Option<String>,
    /// Unix timestamp of the public release date.
    pub release_date: Option<i64>,
    pub is_published: bool,
    pub is_featured: bool,
    pub is_trending: bool,
    pub created: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AlbumDraft {
    pub title: String,
    pub artist_id: EntityId,
    pub genre_id: EntityId,
    pub cover_image_url: Option<String>,
    pub release_date: Option<i64>,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

/// Partial update for an album.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AlbumPatch {
    pub title: Option<String>,
    pub genre_id: Option<EntityId>,
    pub cover_image_url: Option<Option<String>>,
    pub release_date: Option<Option<i64>>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_trending: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: EntityId,
    pub name: String,
}

/// A listener comment attached to an album.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub album_id: EntityId,
    pub user_id: EntityId,
    pub body: String,
    pub created: i64,
}

/// A song joined with the display names charts and search results need.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartRow {
    pub song: Song,
    pub artist_names: Vec<String>,
    pub genre_name: String,
}
