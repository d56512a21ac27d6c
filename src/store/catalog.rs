//! CatalogStore implementation for [`SqliteMarketStore`].

use super::SqliteMarketStore;
use crate::catalog::{
    Album, AlbumDraft, AlbumPatch, CatalogStore, ChartRow, Comment, Genre, NewSong, Song,
    SongPatch,
};
use crate::error::EntityId;
use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Song column list shared by every song query, aliased on `s`.
const SONG_COLS: &str = "s.id, s.title, s.album_id, s.genre_id, s.duration_secs, s.price, \
     s.free_download, s.plays, s.is_published, s.cover_image_url, s.audio_url, \
     s.audio_url_high, s.created";

fn song_from_row(row: &rusqlite::Row) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        title: row.get(1)?,
        artist_ids: Vec::new(),
        album_id: row.get(2)?,
        genre_id: row.get(3)?,
        duration_secs: row.get(4)?,
        price: row.get(5)?,
        free_download: row.get::<_, i64>(6)? != 0,
        plays: row.get(7)?,
        is_published: row.get::<_, i64>(8)? != 0,
        cover_image_url: row.get(9)?,
        audio_url: row.get(10)?,
        audio_url_high: row.get(11)?,
        created: row.get(12)?,
    })
}

fn album_from_row(row: &rusqlite::Row) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get(0)?,
        title: row.get(1)?,
        artist_id: row.get(2)?,
        genre_id: row.get(3)?,
        cover_image_url: row.get(4)?,
        release_date: row.get(5)?,
        is_published: row.get::<_, i64>(6)? != 0,
        is_featured: row.get::<_, i64>(7)? != 0,
        is_trending: row.get::<_, i64>(8)? != 0,
        created: row.get(9)?,
    })
}

const ALBUM_COLS: &str = "id, title, artist_id, genre_id, cover_image_url, release_date, \
     is_published, is_featured, is_trending, created";

fn artist_ids_for_song(conn: &Connection, song_id: EntityId) -> Result<Vec<EntityId>> {
    let mut stmt = conn.prepare_cached(
        "SELECT artist_id FROM song_artists WHERE song_id = ?1 ORDER BY position",
    )?;
    let ids = stmt
        .query_map(params![song_id], |r| r.get(0))?
        .collect::<std::result::Result<Vec<EntityId>, _>>()?;
    Ok(ids)
}

fn artist_names_for_song(conn: &Connection, song_id: EntityId) -> Result<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT u.full_name FROM song_artists sa \
         JOIN users u ON u.id = sa.artist_id \
         WHERE sa.song_id = ?1 ORDER BY sa.position",
    )?;
    let names = stmt
        .query_map(params![song_id], |r| r.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(names)
}

fn load_song(conn: &Connection, id: EntityId) -> Result<Option<Song>> {
    let song = conn
        .query_row(
            &format!("SELECT {SONG_COLS} FROM songs s WHERE s.id = ?1"),
            params![id],
            song_from_row,
        )
        .optional()?;
    match song {
        Some(mut song) => {
            song.artist_ids = artist_ids_for_song(conn, id)?;
            Ok(Some(song))
        }
        None => Ok(None),
    }
}

/// Runs a chart query selecting `{SONG_COLS}, g.name` rows and resolves
/// artist ids and names for each.
fn chart_rows(
    conn: &Connection,
    sql: &str,
    query_params: &[&dyn rusqlite::types::ToSql],
) -> Result<Vec<ChartRow>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows: Vec<(Song, String)> = stmt
        .query_map(query_params, |row| {
            Ok((song_from_row(row)?, row.get(13)?))
        })?
        .collect::<std::result::Result<_, _>>()?;

    let mut out = Vec::with_capacity(rows.len());
    for (mut song, genre_name) in rows {
        song.artist_ids = artist_ids_for_song(conn, song.id)?;
        let artist_names = artist_names_for_song(conn, song.id)?;
        out.push(ChartRow {
            song,
            artist_names,
            genre_name,
        });
    }
    Ok(out)
}

/// Escapes LIKE metacharacters and wraps the query in wildcards.
pub(crate) fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

impl CatalogStore for SqliteMarketStore {
    fn get_genre(&self, id: EntityId) -> Result<Option<Genre>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT id, name FROM genres WHERE id = ?1",
                params![id],
                |r| {
                    Ok(Genre {
                        id: r.get(0)?,
                        name: r.get(1)?,
                    })
                },
            )
            .optional()?)
    }

    fn get_genre_by_name(&self, name: &str) -> Result<Option<Genre>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT id, name FROM genres WHERE name = ?1 COLLATE NOCASE",
                params![name],
                |r| {
                    Ok(Genre {
                        id: r.get(0)?,
                        name: r.get(1)?,
                    })
                },
            )
            .optional()?)
    }

    fn get_album(&self, id: EntityId) -> Result<Option<Album>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        Ok(conn
            .query_row(
                &format!("SELECT {ALBUM_COLS} FROM albums WHERE id = ?1"),
                params![id],
                album_from_row,
            )
            .optional()?)
    }

    fn get_song(&self, id: EntityId) -> Result<Option<Song>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        load_song(&conn, id)
    }

    fn songs_for_album(&self, album_id: EntityId) -> Result<Vec<Song>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {SONG_COLS} FROM songs s WHERE s.album_id = ?1 ORDER BY s.created, s.id"
        ))?;
        let mut songs: Vec<Song> = stmt
            .query_map(params![album_id], song_from_row)?
            .collect::<std::result::Result<_, _>>()?;
        for song in &mut songs {
            song.artist_ids = artist_ids_for_song(&conn, song.id)?;
        }
        Ok(songs)
    }

    fn comments_for_album(&self, album_id: EntityId) -> Result<Vec<Comment>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, album_id, user_id, body, created FROM comments \
             WHERE album_id = ?1 ORDER BY created, id",
        )?;
        let comments = stmt
            .query_map(params![album_id], |r| {
                Ok(Comment {
                    id: r.get(0)?,
                    album_id: r.get(1)?,
                    user_id: r.get(2)?,
                    body: r.get(3)?,
                    created: r.get(4)?,
                })
            })?
            .collect::<std::result::Result<_, _>>()?;
        Ok(comments)
    }

    fn ranked_published_songs(&self) -> Result<Vec<ChartRow>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        chart_rows(
            &conn,
            &format!(
                "SELECT {SONG_COLS}, g.name FROM songs s \
                 JOIN genres g ON g.id = s.genre_id \
                 WHERE s.is_published = 1 ORDER BY s.plays DESC, s.id"
            ),
            &[],
        )
    }

    fn songs_created_between(&self, start: i64, end: i64) -> Result<Vec<ChartRow>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        chart_rows(
            &conn,
            &format!(
                "SELECT {SONG_COLS}, g.name FROM songs s \
                 JOIN genres g ON g.id = s.genre_id \
                 WHERE s.is_published = 1 AND s.created >= ?1 AND s.created < ?2 \
                 ORDER BY s.plays DESC, s.id"
            ),
            &[&start, &end],
        )
    }

    fn latest_songs(&self, limit: usize) -> Result<Vec<ChartRow>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        let limit = limit as i64;
        chart_rows(
            &conn,
            &format!(
                "SELECT {SONG_COLS}, g.name FROM songs s \
                 JOIN genres g ON g.id = s.genre_id \
                 WHERE s.is_published = 1 ORDER BY s.created DESC, s.id DESC LIMIT ?1"
            ),
            &[&limit],
        )
    }

    fn songs_with_genre(&self, genre_id: EntityId) -> Result<Vec<ChartRow>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        chart_rows(
            &conn,
            &format!(
                "SELECT {SONG_COLS}, g.name FROM songs s \
                 JOIN genres g ON g.id = s.genre_id \
                 WHERE s.is_published = 1 AND s.genre_id = ?1 \
                 ORDER BY s.created DESC, s.id DESC"
            ),
            &[&genre_id],
        )
    }

    fn search_songs(&self, query: &str) -> Result<Vec<ChartRow>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        let pattern = like_pattern(query);
        chart_rows(
            &conn,
            &format!(
                "SELECT {SONG_COLS}, g.name FROM songs s \
                 JOIN genres g ON g.id = s.genre_id \
                 WHERE s.is_published = 1 AND s.title LIKE ?1 ESCAPE '\\' \
                 ORDER BY s.plays DESC, s.id"
            ),
            &[&pattern],
        )
    }

    fn search_albums(&self, query: &str) -> Result<Vec<Album>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        let pattern = like_pattern(query);
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {ALBUM_COLS} FROM albums \
             WHERE is_published = 1 AND title LIKE ?1 ESCAPE '\\' ORDER BY created DESC"
        ))?;
        let albums = stmt
            .query_map(params![pattern], album_from_row)?
            .collect::<std::result::Result<_, _>>()?;
        Ok(albums)
    }

    fn create_genre(&self, name: &str) -> Result<Genre> {
        let name = name.trim();
        if name.is_empty() {
            return Err(anyhow!("genre name is empty"));
        }
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        conn.execute("INSERT INTO genres (name) VALUES (?1)", params![name])?;
        Ok(Genre {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn create_album(&self, draft: AlbumDraft) -> Result<Album> {
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO albums (title, artist_id, genre_id, cover_image_url, release_date, \
             is_published) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.title,
                draft.artist_id,
                draft.genre_id,
                draft.cover_image_url,
                draft.release_date,
                draft.is_published as i64,
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            &format!("SELECT {ALBUM_COLS} FROM albums WHERE id = ?1"),
            params![id],
            album_from_row,
        )
        .map_err(Into::into)
    }

    fn update_album(&self, id: EntityId, patch: AlbumPatch) -> Result<Option<Album>> {
        let write_conn = self.write_conn();
        let mut conn = write_conn.lock().unwrap();
        let tx = conn.transaction()?;
        let exists: bool = tx
            .query_row("SELECT 1 FROM albums WHERE id = ?1", params![id], |_| {
                Ok(true)
            })
            .optional()?
            .unwrap_or(false);
        if !exists {
            return Ok(None);
        }
        if let Some(title) = &patch.title {
            tx.execute(
                "UPDATE albums SET title = ?1 WHERE id = ?2",
                params![title, id],
            )?;
        }
        if let Some(genre_id) = patch.genre_id {
            tx.execute(
                "UPDATE albums SET genre_id = ?1 WHERE id = ?2",
                params![genre_id, id],
            )?;
        }
        if let Some(cover) = &patch.cover_image_url {
            tx.execute(
                "UPDATE albums SET cover_image_url = ?1 WHERE id = ?2",
                params![cover, id],
            )?;
        }
        if let Some(release_date) = &patch.release_date {
            tx.execute(
                "UPDATE albums SET release_date = ?1 WHERE id = ?2",
                params![release_date, id],
            )?;
        }
        if let Some(published) = patch.is_published {
            tx.execute(
                "UPDATE albums SET is_published = ?1 WHERE id = ?2",
                params![published as i64, id],
            )?;
        }
        if let Some(featured) = patch.is_featured {
            tx.execute(
                "UPDATE albums SET is_featured = ?1 WHERE id = ?2",
                params![featured as i64, id],
            )?;
        }
        if let Some(trending) = patch.is_trending {
            tx.execute(
                "UPDATE albums SET is_trending = ?1 WHERE id = ?2",
                params![trending as i64, id],
            )?;
        }
        let album = tx.query_row(
            &format!("SELECT {ALBUM_COLS} FROM albums WHERE id = ?1"),
            params![id],
            album_from_row,
        )?;
        tx.commit()?;
        Ok(Some(album))
    }

    fn create_song(&self, song: NewSong) -> Result<Song> {
        if song.artist_ids.is_empty() {
            return Err(anyhow!("song has no artists"));
        }
        let write_conn = self.write_conn();
        let mut conn = write_conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO songs (title, album_id, genre_id, duration_secs, price, \
             free_download, is_published, cover_image_url, audio_url, audio_url_high) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                song.title,
                song.album_id,
                song.genre_id,
                song.duration_secs,
                song.price,
                song.free_download as i64,
                song.is_published as i64,
                song.cover_image_url,
                song.audio_url,
                song.audio_url_high,
            ],
        )?;
        let id = tx.last_insert_rowid();
        for (position, artist_id) in song.artist_ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO song_artists (song_id, artist_id, position) VALUES (?1, ?2, ?3)",
                params![id, artist_id, position as i64],
            )?;
        }
        let created = load_song(&tx, id)?.ok_or_else(|| anyhow!("song {id} vanished mid-insert"))?;
        tx.commit()?;
        Ok(created)
    }

    fn update_song(&self, id: EntityId, patch: SongPatch) -> Result<Option<Song>> {
        let write_conn = self.write_conn();
        let mut conn = write_conn.lock().unwrap();
        let tx = conn.transaction()?;
        if load_song(&tx, id)?.is_none() {
            return Ok(None);
        }
        if let Some(title) = &patch.title {
            tx.execute(
                "UPDATE songs SET title = ?1 WHERE id = ?2",
                params![title, id],
            )?;
        }
        if let Some(genre_id) = patch.genre_id {
            tx.execute(
                "UPDATE songs SET genre_id = ?1 WHERE id = ?2",
                params![genre_id, id],
            )?;
        }
        if let Some(price) = patch.price {
            tx.execute(
                "UPDATE songs SET price = ?1 WHERE id = ?2",
                params![price, id],
            )?;
        }
        if let Some(published) = patch.is_published {
            tx.execute(
                "UPDATE songs SET is_published = ?1 WHERE id = ?2",
                params![published as i64, id],
            )?;
        }
        if let Some(cover) = &patch.cover_image_url {
            tx.execute(
                "UPDATE songs SET cover_image_url = ?1 WHERE id = ?2",
                params![cover, id],
            )?;
        }
        let song = load_song(&tx, id)?.ok_or_else(|| anyhow!("song {id} vanished mid-update"))?;
        tx.commit()?;
        Ok(Some(song))
    }

    fn set_song_album(&self, song_id: EntityId, album_id: Option<EntityId>) -> Result<bool> {
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE songs SET album_id = ?1 WHERE id = ?2",
            params![album_id, song_id],
        )?;
        Ok(changed > 0)
    }

    fn increment_plays(&self, song_id: EntityId) -> Result<bool> {
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE songs SET plays = plays + 1 WHERE id = ?1",
            params![song_id],
        )?;
        Ok(changed > 0)
    }

    fn delete_song(&self, song_id: EntityId) -> Result<bool> {
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        // Fails on the sales foreign key while any sale references the song.
        let deleted = conn.execute("DELETE FROM songs WHERE id = ?1", params![song_id])?;
        Ok(deleted > 0)
    }

    fn add_comment(&self, album_id: EntityId, user_id: EntityId, body: &str) -> Result<Comment> {
        let body = body.trim();
        if body.is_empty() {
            return Err(anyhow!("comment body is empty"));
        }
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO comments (album_id, user_id, body) VALUES (?1, ?2, ?3)",
            params![album_id, user_id, body],
        )?;
        let id = conn.last_insert_rowid();
        conn.query_row(
            "SELECT id, album_id, user_id, body, created FROM comments WHERE id = ?1",
            params![id],
            |r| {
                Ok(Comment {
                    id: r.get(0)?,
                    album_id: r.get(1)?,
                    user_id: r.get(2)?,
                    body: r.get(3)?,
                    created: r.get(4)?,
                })
            },
        )
        .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::catalog::{AlbumDraft, AlbumPatch, CatalogStore, SongPatch};

    #[test]
    fn creates_and_reads_back_a_song() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let other = seed_artist(&store, "Luca");
        let genre = seed_genre(&store, "Jazz");

        let song = seed_song(&store, "Blue Hour", vec![artist.id, other.id], genre.id);
        assert_eq!(song.artist_ids, vec![artist.id, other.id]);

        let loaded = store.get_song(song.id).unwrap().unwrap();
        assert_eq!(loaded, song);
        assert!(store.get_song(9999).unwrap().is_none());
    }

    #[test]
    fn album_song_list_is_derived_from_song_pointers() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
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
        let song_a = seed_song(&store, "One", vec![artist.id], genre.id);
        let song_b = seed_song(&store, "Two", vec![artist.id], genre.id);

        assert!(store.set_song_album(song_a.id, Some(album.id)).unwrap());
        assert!(store.set_song_album(song_b.id, Some(album.id)).unwrap());
        let titles: Vec<String> = store
            .songs_for_album(album.id)
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["One", "Two"]);

        // Moving a song off the album updates the derived list immediately.
        assert!(store.set_song_album(song_a.id, None).unwrap());
        assert_eq!(store.songs_for_album(album.id).unwrap().len(), 1);
    }

    #[test]
    fn update_song_applies_only_present_fields() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let genre = seed_genre(&store, "Jazz");
        let song = seed_song(&store, "Original", vec![artist.id], genre.id);

        let updated = store
            .update_song(
                song.id,
                SongPatch {
                    title: Some("Renamed".to_string()),
                    price: Some(1.49),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.price, 1.49);
        assert_eq!(updated.genre_id, song.genre_id);
        assert_eq!(updated.is_published, song.is_published);

        assert!(store
            .update_song(9999, SongPatch::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn update_album_patches_flags() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
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

        let updated = store
            .update_album(
                album.id,
                AlbumPatch {
                    is_featured: Some(true),
                    cover_image_url: Some(Some("covers/1.jpg".to_string())),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert!(updated.is_featured);
        assert_eq!(updated.cover_image_url.as_deref(), Some("covers/1.jpg"));
        assert_eq!(updated.title, "Nocturnes");
    }

    #[test]
    fn increment_plays_bumps_the_counter() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let genre = seed_genre(&store, "Jazz");
        let song = seed_song(&store, "Played", vec![artist.id], genre.id);

        assert!(store.increment_plays(song.id).unwrap());
        assert!(store.increment_plays(song.id).unwrap());
        assert_eq!(store.get_song(song.id).unwrap().unwrap().plays, 2);
        assert!(!store.increment_plays(9999).unwrap());
    }

    #[test]
    fn ranked_songs_exclude_unpublished_and_sort_by_plays() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let genre = seed_genre(&store, "Jazz");
        let low = seed_song(&store, "Low", vec![artist.id], genre.id);
        let high = seed_song(&store, "High", vec![artist.id], genre.id);
        let hidden = seed_song(&store, "Hidden", vec![artist.id], genre.id);

        for _ in 0..5 {
            store.increment_plays(high.id).unwrap();
        }
        store.increment_plays(low.id).unwrap();
        store
            .update_song(
                hidden.id,
                SongPatch {
                    is_published: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        let ranked = store.ranked_published_songs().unwrap();
        let ids: Vec<_> = ranked.iter().map(|r| r.song.id).collect();
        assert_eq!(ids, vec![high.id, low.id]);
        assert_eq!(ranked[0].genre_name, "Jazz");
        assert_eq!(ranked[0].artist_names, vec!["Nina"]);
    }

    #[test]
    fn search_is_case_insensitive_and_escapes_wildcards() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let genre = seed_genre(&store, "Jazz");
        seed_song(&store, "Midnight Rain", vec![artist.id], genre.id);
        seed_song(&store, "100% Pure", vec![artist.id], genre.id);

        let hits = store.search_songs("midnight").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].song.title, "Midnight Rain");

        // A literal % must not act as a wildcard.
        assert_eq!(store.search_songs("0%").unwrap().len(), 1);
        assert_eq!(store.search_songs("%").unwrap().len(), 1);
    }

    #[test]
    fn genre_lookup_by_name_ignores_case() {
        let (store, _tmp) = create_tmp_store();
        seed_genre(&store, "Hip Hop");
        assert!(store.get_genre_by_name("hip hop").unwrap().is_some());
        assert!(store.get_genre_by_name("Techno").unwrap().is_none());
    }

    #[test]
    fn comments_come_back_in_creation_order() {
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

        store.add_comment(album.id, listener.id, "first").unwrap();
        store.add_comment(album.id, listener.id, "second").unwrap();
        let bodies: Vec<String> = store
            .comments_for_album(album.id)
            .unwrap()
            .into_iter()
            .map(|c| c.body)
            .collect();
        assert_eq!(bodies, vec!["first", "second"]);
    }

    #[test]
    fn deleting_an_unsold_song_works() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let genre = seed_genre(&store, "Jazz");
        let song = seed_song(&store, "Ephemeral", vec![artist.id], genre.id);

        assert!(store.delete_song(song.id).unwrap());
        assert!(store.get_song(song.id).unwrap().is_none());
        assert!(!store.delete_song(song.id).unwrap());
    }
}
