//! CatalogStore trait definition.

use super::models::{
    Album, AlbumDraft, AlbumPatch, ChartRow, Comment, Genre, NewSong, Song, SongPatch,
};
use crate::error::EntityId;
use anyhow::Result;

/// Storage backend for the music catalog.
///
/// Reads that join display names (artist, genre) return [`ChartRow`]s so the
/// view layer never has to issue follow-up lookups per song.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Entity retrieval
    // =========================================================================

    fn get_genre(&self, id: EntityId) -> Result<Option<Genre>>;

    fn get_genre_by_name(&self, name: &str) -> Result<Option<Genre>>;

    fn get_album(&self, id: EntityId) -> Result<Option<Album>>;

    fn get_song(&self, id: EntityId) -> Result<Option<Song>>;

    /// All songs pointing at this album, in track order (creation order).
    fn songs_for_album(&self, album_id: EntityId) -> Result<Vec<Song>>;

    /// Comments on an album, oldest first.
    fn comments_for_album(&self, album_id: EntityId) -> Result<Vec<Comment>>;

    // =========================================================================
    // Chart and discovery reads
    // =========================================================================

    /// Every published song with display names, sorted by play count
    /// descending.
    fn ranked_published_songs(&self) -> Result<Vec<ChartRow>>;

    /// Published songs created in `[start, end)` (unix timestamps), sorted by
    /// play count descending.
    fn songs_created_between(&self, start: i64, end: i64) -> Result<Vec<ChartRow>>;

    /// Most recently created published songs.
    fn latest_songs(&self, limit: usize) -> Result<Vec<ChartRow>>;

    /// Published songs in the given genre, newest first.
    fn songs_with_genre(&self, genre_id: EntityId) -> Result<Vec<ChartRow>>;

    /// Published songs whose title contains `query`, case-insensitively.
    fn search_songs(&self, query: &str) -> Result<Vec<ChartRow>>;

    /// Published albums whose title contains `query`, case-insensitively.
    fn search_albums(&self, query: &str) -> Result<Vec<Album>>;

    // =========================================================================
    // Write operations
    // =========================================================================

    fn create_genre(&self, name: &str) -> Result<Genre>;

    fn create_album(&self, draft: AlbumDraft) -> Result<Album>;

    /// Returns `None` when no album has this id.
    fn update_album(&self, id: EntityId, patch: AlbumPatch) -> Result<Option<Album>>;

    fn create_song(&self, song: NewSong) -> Result<Song>;

    /// Returns `None` when no song has this id.
    fn update_song(&self, id: EntityId, patch: SongPatch) -> Result<Option<Song>>;

    /// Moves a song onto an album (or off every album with `None`). The
    /// album's song list follows automatically since it is derived.
    fn set_song_album(&self, song_id: EntityId, album_id: Option<EntityId>) -> Result<bool>;

    /// Bumps the play counter. Returns false when no song has this id.
    fn increment_plays(&self, song_id: EntityId) -> Result<bool>;

    /// Deletes a song. Fails while any sale references it.
    fn delete_song(&self, song_id: EntityId) -> Result<bool>;

    fn add_comment(&self, album_id: EntityId, user_id: EntityId, body: &str) -> Result<Comment>;
}
