use crate::error::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Listener,
    Artist,
    Admin,
}

impl UserRole {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "listener" => Some(UserRole::Listener),
            "artist" => Some(UserRole::Artist),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            UserRole::Listener => "listener",
            UserRole::Artist => "artist",
            UserRole::Admin => "admin",
        }
    }
}

/// Outcome of an artist's identity verification review.
///
/// `is_verified` on [`UserAccount`] is tracked separately: an account can be
/// rejected and later re-apply, going back to `Pending` while staying
/// unverified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationState {
    No,
    Pending,
    Rejected,
}

impl VerificationState {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "no" => Some(VerificationState::No),
            "pending" => Some(VerificationState::Pending),
            "rejected" => Some(VerificationState::Rejected),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            VerificationState::No => "no",
            VerificationState::Pending => "pending",
            VerificationState::Rejected => "rejected",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: EntityId,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub verification_state: VerificationState,
    pub is_verified: bool,
    /// Connected payout account ids, if the seller has linked one.
    pub stripe_account_id: Option<String>,
    pub paypal_id: Option<String>,
    pub created: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UserDraft {
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
}
