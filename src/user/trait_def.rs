//! UserStore trait definition.

use super::models::{UserAccount, UserDraft, UserRole, VerificationState};
use crate::error::EntityId;
use anyhow::Result;

/// Storage backend for user accounts and the per-user purchased-songs cache.
pub trait UserStore: Send + Sync {
    fn create_user(&self, draft: UserDraft) -> Result<UserAccount>;

    fn get_user(&self, id: EntityId) -> Result<Option<UserAccount>>;

    /// Returns false when no user has this id.
    fn set_user_role(&self, id: EntityId, role: UserRole) -> Result<bool>;

    fn set_verification_state(&self, id: EntityId, state: VerificationState) -> Result<bool>;

    fn set_verified(&self, id: EntityId, verified: bool) -> Result<bool>;

    fn set_payout_accounts(
        &self,
        id: EntityId,
        stripe_account_id: Option<&str>,
        paypal_id: Option<&str>,
    ) -> Result<bool>;

    /// Artists whose full name contains `query`, case-insensitively.
    fn search_artists(&self, query: &str) -> Result<Vec<UserAccount>>;

    /// Verified artist accounts, used to list active sellers.
    fn verified_artists(&self) -> Result<Vec<UserAccount>>;

    // =========================================================================
    // Purchased-songs cache
    // =========================================================================
    //
    // An advisory cache of what a user owns; the sale ledger stays the record
    // of truth. Appends are idempotent.

    fn add_purchased_song(&self, user_id: EntityId, song_id: EntityId) -> Result<()>;

    fn purchased_song_ids(&self, user_id: EntityId) -> Result<Vec<EntityId>>;

    fn has_purchased(&self, user_id: EntityId, song_id: EntityId) -> Result<bool>;
}
