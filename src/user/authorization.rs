//! Ownership-based modification checks.
//!
//! Every mutation of a catalog resource goes through [`can_modify`]: admins
//! may touch anything, everyone else only what they own.

use super::models::UserRole;
use crate::catalog::{Album, Song};
use crate::error::EntityId;

/// The authenticated principal attempting an operation.
#[derive(Clone, Copy, Debug)]
pub struct Actor {
    pub id: EntityId,
    pub role: UserRole,
}

/// A resource with an accountable owner.
pub trait OwnedResource {
    fn is_owned_by(&self, user_id: EntityId) -> bool;
}

impl OwnedResource for Song {
    fn is_owned_by(&self, user_id: EntityId) -> bool {
        self.artist_ids.contains(&user_id)
    }
}

impl OwnedResource for Album {
    fn is_owned_by(&self, user_id: EntityId) -> bool {
        self.artist_id == user_id
    }
}

pub fn can_modify<R: OwnedResource>(actor: &Actor, resource: &R) -> bool {
    actor.role == UserRole::Admin || resource.is_owned_by(actor.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song_by(artist_ids: Vec<EntityId>) -> Song {
        Song {
            id: 1,
            title: "Test Song".to_string(),
            artist_ids,
            album_id: None,
            genre_id: 1,
            duration_secs: 200,
            price: 0.99,
            free_download: false,
            plays: 0,
            is_published: true,
            cover_image_url: None,
            audio_url: "audio/1".to_string(),
            audio_url_high: None,
            created: 0,
        }
    }

    #[test]
    fn admin_can_modify_anything() {
        let admin = Actor {
            id: 99,
            role: UserRole::Admin,
        };
        assert!(can_modify(&admin, &song_by(vec![1, 2])));
    }

    #[test]
    fn any_credited_artist_owns_the_song() {
        let song = song_by(vec![1, 2]);
        for id in [1, 2] {
            let artist = Actor {
                id,
                role: UserRole::Artist,
            };
            assert!(can_modify(&artist, &song));
        }
    }

    #[test]
    fn non_owner_cannot_modify() {
        let other = Actor {
            id: 3,
            role: UserRole::Artist,
        };
        assert!(!can_modify(&other, &song_by(vec![1, 2])));

        let listener = Actor {
            id: 1,
            role: UserRole::Listener,
        };
        // Listeners can still own resources in principle; the check is
        // ownership, not role.
        assert!(can_modify(&listener, &song_by(vec![1])));
    }
}
