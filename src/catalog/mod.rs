//! Music catalog: songs, albums, genres and album comments.

pub mod duration;
mod models;
mod trait_def;

pub use models::{
    Album, AlbumDraft, AlbumPatch, ChartRow, Comment, Genre, NewSong, RawDuration, Song,
    SongDraft, SongPatch,
};
pub use trait_def::CatalogStore;
