//! User accounts, roles and ownership checks.

mod authorization;
mod models;
mod trait_def;

pub use authorization::{can_modify, Actor, OwnedResource};
pub use models::{UserAccount, UserDraft, UserRole, VerificationState};
pub use trait_def::UserStore;
