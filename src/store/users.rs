//! UserStore implementation for [`SqliteMarketStore`].

use super::SqliteMarketStore;
use crate::error::EntityId;
use crate::user::{UserAccount, UserDraft, UserRole, UserStore, VerificationState};
use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, OptionalExtension};

const USER_COLS: &str = "id, full_name, email, role, verification_state, is_verified, \
     stripe_account_id, paypal_id, created";

fn user_from_row(row: &rusqlite::Row) -> rusqlite::Result<UserAccount> {
    let role_str: String = row.get(3)?;
    let state_str: String = row.get(4)?;
    Ok(UserAccount {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        role: UserRole::from_db_str(&role_str).unwrap_or(UserRole::Listener),
        verification_state: VerificationState::from_db_str(&state_str)
            .unwrap_or(VerificationState::No),
        is_verified: row.get::<_, i64>(5)? != 0,
        stripe_account_id: row.get(6)?,
        paypal_id: row.get(7)?,
        created: row.get(8)?,
    })
}

fn load_user(conn: &Connection, id: EntityId) -> Result<Option<UserAccount>> {
    Ok(conn
        .query_row(
            &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()?)
}

impl UserStore for SqliteMarketStore {
    fn create_user(&self, draft: UserDraft) -> Result<UserAccount> {
        let email = draft.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(anyhow!("invalid email: {:?}", draft.email));
        }
        if draft.full_name.trim().is_empty() {
            return Err(anyhow!("full name is empty"));
        }
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (full_name, email, role) VALUES (?1, ?2, ?3)",
            params![draft.full_name.trim(), email, draft.role.to_db_str()],
        )?;
        let id = conn.last_insert_rowid();
        load_user(&conn, id)?.ok_or_else(|| anyhow!("user {id} vanished mid-insert"))
    }

    fn get_user(&self, id: EntityId) -> Result<Option<UserAccount>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        load_user(&conn, id)
    }

    fn set_user_role(&self, id: EntityId, role: UserRole) -> Result<bool> {
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE users SET role = ?1 WHERE id = ?2",
            params![role.to_db_str(), id],
        )?;
        Ok(changed > 0)
    }

    fn set_verification_state(&self, id: EntityId, state: VerificationState) -> Result<bool> {
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE users SET verification_state = ?1 WHERE id = ?2",
            params![state.to_db_str(), id],
        )?;
        Ok(changed > 0)
    }

    fn set_verified(&self, id: EntityId, verified: bool) -> Result<bool> {
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE users SET is_verified = ?1 WHERE id = ?2",
            params![verified as i64, id],
        )?;
        Ok(changed > 0)
    }

    fn set_payout_accounts(
        &self,
        id: EntityId,
        stripe_account_id: Option<&str>,
        paypal_id: Option<&str>,
    ) -> Result<bool> {
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE users SET stripe_account_id = ?1, paypal_id = ?2 WHERE id = ?3",
            params![stripe_account_id, paypal_id, id],
        )?;
        Ok(changed > 0)
    }

    fn search_artists(&self, query: &str) -> Result<Vec<UserAccount>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        let pattern = super::catalog::like_pattern(query);
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {USER_COLS} FROM users \
             WHERE role = 'artist' AND full_name LIKE ?1 ESCAPE '\\' ORDER BY full_name"
        ))?;
        let users = stmt
            .query_map(params![pattern], user_from_row)?
            .collect::<std::result::Result<_, _>>()?;
        Ok(users)
    }

    fn verified_artists(&self) -> Result<Vec<UserAccount>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {USER_COLS} FROM users \
             WHERE role = 'artist' AND is_verified = 1 ORDER BY full_name"
        ))?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<std::result::Result<_, _>>()?;
        Ok(users)
    }

    fn add_purchased_song(&self, user_id: EntityId, song_id: EntityId) -> Result<()> {
        let write_conn = self.write_conn();
        let conn = write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO purchased_songs (user_id, song_id) VALUES (?1, ?2) \
             ON CONFLICT (user_id, song_id) DO NOTHING",
            params![user_id, song_id],
        )?;
        Ok(())
    }

    fn purchased_song_ids(&self, user_id: EntityId) -> Result<Vec<EntityId>> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT song_id FROM purchased_songs WHERE user_id = ?1 ORDER BY created, song_id",
        )?;
        let ids = stmt
            .query_map(params![user_id], |r| r.get(0))?
            .collect::<std::result::Result<_, _>>()?;
        Ok(ids)
    }

    fn has_purchased(&self, user_id: EntityId, song_id: EntityId) -> Result<bool> {
        let read_conn = self.read_conn();
        let conn = read_conn.lock().unwrap();
        Ok(conn
            .query_row(
                "SELECT 1 FROM purchased_songs WHERE user_id = ?1 AND song_id = ?2",
                params![user_id, song_id],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::user::{UserDraft, UserRole, UserStore, VerificationState};

    #[test]
    fn creates_and_reads_back_a_user() {
        let (store, _tmp) = create_tmp_store();
        let user = store
            .create_user(UserDraft {
                full_name: "Nina Simone".to_string(),
                email: "Nina@Example.com".to_string(),
                role: UserRole::Artist,
            })
            .unwrap();
        assert_eq!(user.email, "nina@example.com");
        assert_eq!(user.role, UserRole::Artist);
        assert_eq!(user.verification_state, VerificationState::No);
        assert!(!user.is_verified);

        let loaded = store.get_user(user.id).unwrap().unwrap();
        assert_eq!(loaded, user);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (store, _tmp) = create_tmp_store();
        seed_listener(&store, "Paul");
        let dup = store.create_user(UserDraft {
            full_name: "Other Paul".to_string(),
            email: "paul@example.com".to_string(),
            role: UserRole::Listener,
        });
        assert!(dup.is_err());
    }

    #[test]
    fn verification_flow_updates_state_and_flag() {
        let (store, _tmp) = create_tmp_store();
        let user = seed_listener(&store, "Amara");
        store.set_user_role(user.id, UserRole::Artist).unwrap();
        store
            .set_verification_state(user.id, VerificationState::Pending)
            .unwrap();
        store.set_verified(user.id, true).unwrap();

        let loaded = store.get_user(user.id).unwrap().unwrap();
        assert_eq!(loaded.role, UserRole::Artist);
        assert_eq!(loaded.verification_state, VerificationState::Pending);
        assert!(loaded.is_verified);

        assert!(!store.set_verified(9999, true).unwrap());
    }

    #[test]
    fn verified_artists_excludes_listeners_and_unverified() {
        let (store, _tmp) = create_tmp_store();
        seed_artist(&store, "Verified Artist");
        seed_listener(&store, "Just Listening");
        let unverified = store
            .create_user(UserDraft {
                full_name: "Waiting Artist".to_string(),
                email: "waiting@example.com".to_string(),
                role: UserRole::Artist,
            })
            .unwrap();

        let verified = store.verified_artists().unwrap();
        assert_eq!(verified.len(), 1);
        assert_eq!(verified[0].full_name, "Verified Artist");
        assert!(verified.iter().all(|u| u.id != unverified.id));
    }

    #[test]
    fn purchased_songs_cache_is_idempotent() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        let buyer = seed_listener(&store, "Paul");
        let genre = seed_genre(&store, "Jazz");
        let song = seed_song(&store, "Blue Hour", vec![artist.id], genre.id);

        assert!(!store.has_purchased(buyer.id, song.id).unwrap());
        store.add_purchased_song(buyer.id, song.id).unwrap();
        store.add_purchased_song(buyer.id, song.id).unwrap();
        assert!(store.has_purchased(buyer.id, song.id).unwrap());
        assert_eq!(store.purchased_song_ids(buyer.id).unwrap(), vec![song.id]);
    }

    #[test]
    fn artist_search_matches_substrings() {
        let (store, _tmp) = create_tmp_store();
        seed_artist(&store, "Nina Simone");
        seed_artist(&store, "Miles Davis");
        seed_listener(&store, "Nina Fan");

        let hits = store.search_artists("nina").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].full_name, "Nina Simone");
    }

    #[test]
    fn payout_accounts_round_trip() {
        let (store, _tmp) = create_tmp_store();
        let artist = seed_artist(&store, "Nina");
        store
            .set_payout_accounts(artist.id, Some("acct_123"), None)
            .unwrap();
        let loaded = store.get_user(artist.id).unwrap().unwrap();
        assert_eq!(loaded.stripe_account_id.as_deref(), Some("acct_123"));
        assert!(loaded.paypal_id.is_none());
    }
}
