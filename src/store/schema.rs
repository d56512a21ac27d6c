//! Declarative schema for the market database.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};

const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("full_name", &SqlType::Text, non_null = true),
        sqlite_column!("email", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("role", &SqlType::Text, non_null = true),
        sqlite_column!(
            "verification_state",
            &SqlType::Text,
            non_null = true,
            default_value = Some("'no'")
        ),
        sqlite_column!(
            "is_verified",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("stripe_account_id", &SqlType::Text),
        sqlite_column!("paypal_id", &SqlType::Text),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_users_role", "role")],
    unique_constraints: &[],
};

const GENRES_TABLE: Table = Table {
    name: "genres",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true, is_unique = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

const ALBUM_ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const ALBUM_GENRE_FK: ForeignKey = ForeignKey {
    foreign_table: "genres",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ALBUM_ARTIST_FK)
        ),
        sqlite_column!(
            "genre_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ALBUM_GENRE_FK)
        ),
        sqlite_column!("cover_image_url", &SqlType::Text),
        sqlite_column!("release_date", &SqlType::Integer),
        sqlite_column!(
            "is_published",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("1")
        ),
        sqlite_column!(
            "is_featured",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "is_trending",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_albums_artist", "artist_id")],
    unique_constraints: &[],
};

// Deleting an album orphans its songs rather than deleting them; album
// membership is advisory, the song rows are the valuable part.
const SONG_ALBUM_FK: ForeignKey = ForeignKey {
    foreign_table: "albums",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::SetNull,
};

const SONG_GENRE_FK: ForeignKey = ForeignKey {
    foreign_table: "genres",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("album_id", &SqlType::Integer, foreign_key = Some(&SONG_ALBUM_FK)),
        sqlite_column!(
            "genre_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONG_GENRE_FK)
        ),
        sqlite_column!("duration_secs", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "price",
            &SqlType::Real,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "free_download",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "plays",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "is_published",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("1")
        ),
        sqlite_column!("cover_image_url", &SqlType::Text),
        sqlite_column!("audio_url", &SqlType::Text, non_null = true),
        sqlite_column!("audio_url_high", &SqlType::Text),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_songs_album", "album_id"),
        ("idx_songs_genre", "genre_id"),
        ("idx_songs_plays", "plays"),
        ("idx_songs_created", "created"),
    ],
    unique_constraints: &[],
};

const SONG_ARTIST_SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const SONG_ARTIST_USER_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const SONG_ARTISTS_TABLE: Table = Table {
    name: "song_artists",
    columns: &[
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONG_ARTIST_SONG_FK)
        ),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONG_ARTIST_USER_FK)
        ),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[
        ("idx_song_artists_song", "song_id"),
        ("idx_song_artists_artist", "artist_id"),
    ],
    unique_constraints: &[&["song_id", "artist_id"]],
};

const COMMENT_ALBUM_FK: ForeignKey = ForeignKey {
    foreign_table: "albums",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const COMMENT_USER_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const COMMENTS_TABLE: Table = Table {
    name: "comments",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "album_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&COMMENT_ALBUM_FK)
        ),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&COMMENT_USER_FK)
        ),
        sqlite_column!("body", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_comments_album", "album_id")],
    unique_constraints: &[],
};

// Sold songs must never disappear from under the ledger.
const SALE_SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const SALE_BUYER_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const SALE_SELLER_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const SALES_TABLE: Table = Table {
    name: "sales",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SALE_SONG_FK)
        ),
        sqlite_column!(
            "buyer_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SALE_BUYER_FK)
        ),
        sqlite_column!(
            "seller_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SALE_SELLER_FK)
        ),
        sqlite_column!("gross_amount", &SqlType::Real, non_null = true),
        sqlite_column!("platform_fee", &SqlType::Real, non_null = true),
        sqlite_column!("seller_earning", &SqlType::Real, non_null = true),
        sqlite_column!("currency", &SqlType::Text, non_null = true),
        sqlite_column!("exchange_rate", &SqlType::Real),
        sqlite_column!("charge_id", &SqlType::Text, non_null = true),
        sqlite_column!("payment_intent_id", &SqlType::Text),
        sqlite_column!("receipt_url", &SqlType::Text),
        sqlite_column!("processor_details", &SqlType::Text),
        sqlite_column!(
            "payout_status",
            &SqlType::Text,
            non_null = true,
            default_value = Some("'pending'")
        ),
        sqlite_column!("payout_date", &SqlType::Integer),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_sales_buyer", "buyer_id"),
        ("idx_sales_seller", "seller_id"),
        ("idx_sales_payout_status", "payout_status"),
    ],
    // The duplicate-purchase guard. Enforced here so concurrent purchases of
    // the same song by the same buyer cannot both commit.
    unique_constraints: &[&["song_id", "buyer_id"]],
};

const DAILY_STATS_USER_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const DAILY_STATS_TABLE: Table = Table {
    name: "daily_stats",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&DAILY_STATS_USER_FK)
        ),
        sqlite_column!("day", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "downloads",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "purchases",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "revenue",
            &SqlType::Real,
            non_null = true,
            default_value = Some("0")
        ),
    ],
    indices: &[("idx_daily_stats_day", "day")],
    // One row per user per day; the upsert target.
    unique_constraints: &[&["user_id", "day"]],
};

const PURCHASED_SONG_USER_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const PURCHASED_SONG_SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const PURCHASED_SONGS_TABLE: Table = Table {
    name: "purchased_songs",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&PURCHASED_SONG_USER_FK)
        ),
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&PURCHASED_SONG_SONG_FK)
        ),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_purchased_songs_user", "user_id")],
    unique_constraints: &[&["user_id", "song_id"]],
};

pub const MARKET_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        USERS_TABLE,
        GENRES_TABLE,
        ALBUMS_TABLE,
        SONGS_TABLE,
        SONG_ARTISTS_TABLE,
        COMMENTS_TABLE,
        SALES_TABLE,
        DAILY_STATS_TABLE,
        PURCHASED_SONGS_TABLE,
    ],
    migration: None,
}];
