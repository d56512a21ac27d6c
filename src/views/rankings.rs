//! Pure chart-assembly logic: dedup and backfill.
//!
//! Kept free of store access so the ranking rules are testable with
//! in-memory rows.

use crate::catalog::ChartRow;
use crate::error::EntityId;
use rand::seq::IndexedRandom;
use std::collections::HashSet;

/// Identity of a song for chart dedup purposes: same title (trimmed) and the
/// same set of credited artists. The same recording uploaded both as a
/// single and as an album track collapses to one chart entry.
fn identity_key(row: &ChartRow) -> (String, Vec<EntityId>) {
    let mut artists = row.song.artist_ids.clone();
    artists.sort_unstable();
    (row.song.title.trim().to_string(), artists)
}

/// Drops duplicate songs, keeping the first occurrence. Input is expected
/// sorted by play count descending, so the survivor is the higher-played
/// copy.
pub(crate) fn dedup_rows(rows: Vec<ChartRow>) -> Vec<ChartRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(identity_key(row)))
        .collect()
}

/// Extends `selected` up to `target` entries from `pool`, skipping pool rows
/// whose song id or identity already appears. Pool rows are taken in order.
pub(crate) fn backfill_in_order(
    mut selected: Vec<ChartRow>,
    pool: Vec<ChartRow>,
    target: usize,
) -> Vec<ChartRow> {
    let mut ids: HashSet<EntityId> = selected.iter().map(|r| r.song.id).collect();
    let mut keys: HashSet<_> = selected.iter().map(identity_key).collect();
    for row in pool {
        if selected.len() >= target {
            break;
        }
        if ids.contains(&row.song.id) || !keys.insert(identity_key(&row)) {
            continue;
        }
        ids.insert(row.song.id);
        selected.push(row);
    }
    selected
}

/// Extends `selected` up to `target` entries with a random non-overlapping
/// sample from `pool`.
pub(crate) fn backfill_random(
    mut selected: Vec<ChartRow>,
    pool: Vec<ChartRow>,
    target: usize,
) -> Vec<ChartRow> {
    if selected.len() >= target {
        return selected;
    }
    let ids: HashSet<EntityId> = selected.iter().map(|r| r.song.id).collect();
    let candidates: Vec<ChartRow> = pool
        .into_iter()
        .filter(|row| !ids.contains(&row.song.id))
        .collect();
    let need = target - selected.len();
    let mut picked: Vec<ChartRow> = candidates
        .choose_multiple(&mut rand::rng(), need)
        .cloned()
        .collect();
    selected.append(&mut picked);
    selected
}
