//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::identity::Identity;
use crate::domain::value_object::{email::Email, identity_id::IdentityId, provider::Provider};
use crate::error::AuthResult;
use kernel::page::{Page, Paged};

/// Identity repository trait
#[trait_variant::make(IdentityRepository: Send)]
pub trait LocalIdentityRepository {
    /// Create a new identity
    async fn create(&self, identity: &Identity) -> AuthResult<()>;

    /// Find identity by ID
    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>>;

    /// Find identity by normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>>;

    /// Find identity by provider-side user ID
    async fn find_by_provider_id(
        &self,
        provider: Provider,
        provider_user_id: &str,
    ) -> AuthResult<Option<Identity>>;

    /// Case-insensitive substring search over first and last name
    async fn search_by_name(&self, name: &str, page: Page) -> AuthResult<Paged<Identity>>;

    /// Persist changed fields
    async fn update(&self, identity: &Identity) -> AuthResult<()>;

    /// Delete an identity
    async fn delete(&self, identity_id: &IdentityId) -> AuthResult<()>;
}
