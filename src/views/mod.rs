//! Read-model assembly over the catalog, user and ledger stores.
//!
//! The view builder owns no state of its own; every view is recomputed from
//! the store on request.

mod rankings;

use crate::catalog::{duration, Album, CatalogStore, ChartRow, Comment, Genre};
use crate::error::{EntityId, MarketError, MarketResult};
use crate::user::UserStore;
use anyhow::anyhow;
use chrono::{Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::Serialize;

/// Everything the album page needs in one response.
#[derive(Clone, Debug, Serialize)]
pub struct AlbumDetail {
    pub album: Album,
    pub artist: ArtistSummary,
    pub genre: Genre,
    /// Derived from songs pointing at this album, never stored on the album.
    pub songs: Vec<crate::catalog::Song>,
    pub comments: Vec<Comment>,
    pub total_songs: usize,
    pub total_duration_secs: u32,
    /// `total_duration_secs` rendered as "MM:SS".
    pub total_duration_display: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArtistSummary {
    pub id: EntityId,
    pub full_name: String,
}

/// Result of a catalog-wide search. An all-empty result is distinguished
/// from a malformed query, which is a `Validation` error.
#[derive(Clone, Debug, Serialize)]
pub enum SearchOutcome {
    Found(SearchResults),
    NoMatches,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchResults {
    pub artists: Vec<ArtistSummary>,
    pub albums: Vec<AlbumHit>,
    pub songs: Vec<ChartRow>,
}

/// An album search hit with the entities its result card shows.
#[derive(Clone, Debug, Serialize)]
pub struct AlbumHit {
    pub album: Album,
    pub artist_name: String,
    pub songs: Vec<crate::catalog::Song>,
}

/// Builds aggregated read models on top of a market store.
#[derive(Clone)]
pub struct ViewBuilder<S> {
    store: S,
    chart_size: usize,
}

impl<S> ViewBuilder<S>
where
    S: CatalogStore + UserStore,
{
    pub fn new(store: S, chart_size: usize) -> Self {
        Self { store, chart_size }
    }

    /// Album page aggregate: album, artist, genre, derived song list,
    /// comments and duration totals.
    pub fn album_detail(&self, album_id: EntityId) -> MarketResult<AlbumDetail> {
        let album = self
            .store
            .get_album(album_id)?
            .ok_or_else(|| MarketError::not_found("album", album_id))?;
        let artist = self
            .store
            .get_user(album.artist_id)?
            .ok_or_else(|| MarketError::not_found("user", album.artist_id))?;
        let genre = self
            .store
            .get_genre(album.genre_id)?
            .ok_or_else(|| MarketError::not_found("genre", album.genre_id))?;
        let songs = self.store.songs_for_album(album_id)?;
        let comments = self.store.comments_for_album(album_id)?;

        let total_duration_secs: u32 = songs.iter().map(|s| s.duration_secs).sum();
        Ok(AlbumDetail {
            artist: ArtistSummary {
                id: artist.id,
                full_name: artist.full_name,
            },
            genre,
            total_songs: songs.len(),
            total_duration_secs,
            total_duration_display: duration::format_mm_ss(total_duration_secs),
            songs,
            comments,
            album,
        })
    }

    /// All-time top chart: songs with plays ranked descending; remaining
    /// slots filled with a random non-overlapping sample of zero-play songs.
    pub fn top_songs(&self) -> MarketResult<Vec<ChartRow>> {
        let ranked = self.store.ranked_published_songs()?;
        let (played, unplayed): (Vec<ChartRow>, Vec<ChartRow>) =
            ranked.into_iter().partition(|r| r.song.plays > 0);
        let mut chart: Vec<ChartRow> = played.into_iter().take(self.chart_size).collect();
        if chart.len() < self.chart_size {
            chart = rankings::backfill_random(chart, unplayed, self.chart_size);
        }
        Ok(chart)
    }

    /// This ISO week's chart: songs created since Monday 00:00 UTC, deduped
    /// by recording identity, backfilled from the all-time ranking and
    /// sorted by play count descending.
    pub fn weekly_top(&self) -> MarketResult<Vec<ChartRow>> {
        let now = Utc::now();
        let start = iso_week_start(now.date_naive())?;
        let weekly = self.store.songs_created_between(start, now.timestamp() + 1)?;
        let mut chart = rankings::dedup_rows(weekly);
        chart.truncate(self.chart_size);
        if chart.len() < self.chart_size {
            let pool = self.store.ranked_published_songs()?;
            chart = rankings::backfill_in_order(chart, pool, self.chart_size);
        }
        chart.sort_by(|a, b| b.song.plays.cmp(&a.song.plays));
        Ok(chart)
    }

    pub fn new_releases(&self, limit: usize) -> MarketResult<Vec<ChartRow>> {
        Ok(self.store.latest_songs(limit)?)
    }

    /// Published songs in the named genre. An unknown genre name is
    /// `NotFound`; a known genre with no songs is an empty list.
    pub fn songs_by_genre(&self, genre_name: &str) -> MarketResult<Vec<ChartRow>> {
        let genre = self
            .store
            .get_genre_by_name(genre_name)?
            .ok_or_else(|| MarketError::not_found("genre", genre_name))?;
        Ok(self.store.songs_with_genre(genre.id)?)
    }

    /// Case-insensitive substring search across artists, albums and songs.
    /// A blank query is rejected outright.
    pub fn search(&self, query: &str) -> MarketResult<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MarketError::validation("search query is empty"));
        }
        let artists: Vec<ArtistSummary> = self
            .store
            .search_artists(query)?
            .into_iter()
            .map(|u| ArtistSummary {
                id: u.id,
                full_name: u.full_name,
            })
            .collect();
        let mut albums = Vec::new();
        for album in self.store.search_albums(query)? {
            // An album whose artist account is gone has nothing to show.
            let Some(artist) = self.store.get_user(album.artist_id)? else {
                continue;
            };
            let songs = self.store.songs_for_album(album.id)?;
            albums.push(AlbumHit {
                artist_name: artist.full_name,
                songs,
                album,
            });
        }
        let songs = self.store.search_songs(query)?;

        if artists.is_empty() && albums.is_empty() && songs.is_empty() {
            return Ok(SearchOutcome::NoMatches);
        }
        Ok(SearchOutcome::Found(SearchResults {
            artists,
            albums,
            songs,
        }))
    }
}

/// Unix timestamp of Monday 00:00 UTC of `today`'s ISO week.
fn iso_week_start(today: NaiveDate) -> MarketResult<i64> {
    let week = today.iso_week();
    let monday = NaiveDate::from_isoywd_opt(week.year(), week.week(), Weekday::Mon)
        .ok_or_else(|| anyhow!("invalid iso week for {today}"))?;
    Ok(monday.and_time(NaiveTime::MIN).and_utc().timestamp())
}


#[cfg(test)]
mod store_tests {
    use super::*;
    use crate::catalog::{AlbumDraft, CatalogStore, RawDuration, SongDraft};
    use crate::error::EntityId;
    use crate::store::test_support::*;
    use crate::store::SqliteMarketStore;
    use std::collections::HashSet;

    fn builder(store: &SqliteMarketStore, chart_size: usize) -> ViewBuilder<SqliteMarketStore> {
        ViewBuilder::new(store.clone(), chart_size)
    }

    fn backdate_song(store: &SqliteMarketStore, song_id: EntityId, created: i64) {
        let write_conn = store.write_conn();
        let conn = write_conn.lock().unwrap();
        conn.execute(
            "UPDATE songs SET created = ?1 WHERE id = ?2",
            rusqlite::params![created, song_id],
        )
        .unwrap();
    }

    fn bump_plays(store: &SqliteMarketStore, song_id: EntityId, plays: i64) {
        for _ in 0..plays {
            store.increment_plays(song_id).unwrap();
        }
    }

    #[test]
    fn album_detail_aggregates_songs_comments_and_totals() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let listener = seed_listener(&store, "Paul");
        let genre = seed_genre(&store, "Jazz");
        let album = store
            .create_album(AlbumDraft {
                title: "Nocturnes".to_string(),
                artist_id: artist.id,
                genre_id: genre.id,
                cover_image_url: None,
                release_date: None,
                is_published: true,
            })
            .unwrap();

        // One duration arrived numeric, one as a clock string; the totals
        // must not care.
        for (title, duration) in [
            ("One", RawDuration::Seconds(245.0)),
            ("Two", RawDuration::Text("4:05".to_string())),
        ] {
            let new_song = SongDraft {
                title: title.to_string(),
                artist_ids: vec![artist.id],
                album_id: Some(album.id),
                genre_id: genre.id,
                duration,
                price: 0.99,
                free_download: false,
                is_published: true,
                cover_image_url: None,
                audio_url: format!("audio/{title}"),
                audio_url_high: None,
            }
            .normalize()
            .unwrap();
            store.create_song(new_song).unwrap();
        }
        store.add_comment(album.id, listener.id, "lovely").unwrap();

        let detail = builder(&store, 15).album_detail(album.id).unwrap();
        assert_eq!(detail.total_songs, 2);
        assert_eq!(detail.total_duration_secs, 490);
        assert_eq!(detail.total_duration_display, "8:10");
        assert_eq!(detail.artist.full_name, "Nina");
        assert_eq!(detail.genre.name, "Jazz");
        assert_eq!(detail.comments.len(), 1);

        assert!(matches!(
            builder(&store, 15).album_detail(9999),
            Err(MarketError::NotFound { .. })
        ));
    }

    #[test]
    fn top_songs_ranks_then_backfills_with_zero_play_songs() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let genre = seed_genre(&store, "Jazz");
        let hit = seed_song(&store, "Hit", vec![artist.id], genre.id);
        bump_plays(&store, hit.id, 5);
        for i in 0..4 {
            seed_song(&store, &format!("Quiet {i}"), vec![artist.id], genre.id);
        }

        let chart = builder(&store, 3).top_songs().unwrap();
        assert_eq!(chart.len(), 3);
        assert_eq!(chart[0].song.id, hit.id);
        let ids: HashSet<EntityId> = chart.iter().map(|r| r.song.id).collect();
        assert_eq!(ids.len(), 3);

        // Fewer songs than slots: everything comes back once.
        let wide = builder(&store, 50).top_songs().unwrap();
        assert_eq!(wide.len(), 5);
    }

    #[test]
    fn weekly_top_windows_dedups_and_backfills() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let genre = seed_genre(&store, "Jazz");
        let week_start = iso_week_start(Utc::now().date_naive()).unwrap();

        // Two uploads of the same recording this week, plus a distinct one.
        let single = seed_song(&store, "Echoes", vec![artist.id], genre.id);
        let album_cut = seed_song(&store, "Echoes", vec![artist.id], genre.id);
        let fresh = seed_song(&store, "New Thing", vec![artist.id], genre.id);
        bump_plays(&store, single.id, 10);
        bump_plays(&store, album_cut.id, 2);

        // An old favorite outside the window.
        let old = seed_song(&store, "Old Favorite", vec![artist.id], genre.id);
        bump_plays(&store, old.id, 100);
        backdate_song(&store, old.id, week_start - 1);

        let chart = builder(&store, 3).weekly_top().unwrap();
        let ids: Vec<EntityId> = chart.iter().map(|r| r.song.id).collect();
        // The duplicate collapses to the higher-played copy, the remaining
        // slot backfills from the all-time pool, and the final order is by
        // plays.
        assert_eq!(chart.len(), 3);
        assert!(ids.contains(&single.id));
        assert!(!ids.contains(&album_cut.id));
        assert!(ids.contains(&fresh.id));
        assert!(ids.contains(&old.id));
        assert_eq!(ids[0], old.id);
    }

    #[test]
    fn weekly_top_with_empty_window_serves_all_time_songs() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let genre = seed_genre(&store, "Jazz");
        let week_start = iso_week_start(Utc::now().date_naive()).unwrap();
        let old = seed_song(&store, "Back Catalog", vec![artist.id], genre.id);
        backdate_song(&store, old.id, week_start - 100);

        let chart = builder(&store, 5).weekly_top().unwrap();
        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0].song.id, old.id);
    }

    #[test]
    fn new_releases_come_back_newest_first() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let genre = seed_genre(&store, "Jazz");
        let a = seed_song(&store, "A", vec![artist.id], genre.id);
        let b = seed_song(&store, "B", vec![artist.id], genre.id);
        backdate_song(&store, a.id, 1000);
        backdate_song(&store, b.id, 2000);

        let releases = builder(&store, 15).new_releases(10).unwrap();
        let ids: Vec<EntityId> = releases.iter().map(|r| r.song.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn songs_by_genre_rejects_unknown_names() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let genre = seed_genre(&store, "Jazz");
        seed_song(&store, "Blue Hour", vec![artist.id], genre.id);

        let songs = builder(&store, 15).songs_by_genre("jazz").unwrap();
        assert_eq!(songs.len(), 1);
        assert!(matches!(
            builder(&store, 15).songs_by_genre("polka"),
            Err(MarketError::NotFound { .. })
        ));
    }

    #[test]
    fn search_distinguishes_bad_query_from_no_matches() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina Simone");
        let genre = seed_genre(&store, "Jazz");
        let song = seed_song(&store, "Blue Hour", vec![artist.id], genre.id);
        let album = store
            .create_album(AlbumDraft {
                title: "Blue Notes".to_string(),
                artist_id: artist.id,
                genre_id: genre.id,
                cover_image_url: None,
                release_date: None,
                is_published: true,
            })
            .unwrap();
        store.set_song_album(song.id, Some(album.id)).unwrap();

        let vb = builder(&store, 15);
        assert!(matches!(vb.search("  "), Err(MarketError::Validation(_))));
        assert!(matches!(vb.search("zzzzz"), Ok(SearchOutcome::NoMatches)));

        match vb.search("nina").unwrap() {
            SearchOutcome::Found(results) => {
                assert_eq!(results.artists.len(), 1);
                assert!(results.songs.is_empty());
            }
            SearchOutcome::NoMatches => panic!("expected a match"),
        }
        match vb.search("blue").unwrap() {
            SearchOutcome::Found(results) => {
                assert_eq!(results.songs.len(), 1);
                assert_eq!(results.albums.len(), 1);
                assert_eq!(results.albums[0].artist_name, "Nina Simone");
                assert_eq!(results.albums[0].songs.len(), 1);
                assert!(results.artists.is_empty());
            }
            SearchOutcome::NoMatches => panic!("expected a match"),
        }
    }
}
