//! Profile Use Case
//!
//! Read, update and delete operations on the authenticated identity, plus the
//! public lookups (by ID, by name search).

use std::sync::Arc;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::identity_id::IdentityId;
use crate::error::{AuthError, AuthResult};
use kernel::page::{Page, Paged};
use platform::media::MediaStore;

/// Fields a profile update may touch. `None` leaves a field untouched.
#[derive(Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
    /// Raw bytes of a replacement profile picture
    pub thumbnail: Option<(String, Vec<u8>)>,
}

/// Profile use case
pub struct ProfileUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    media: Arc<dyn MediaStore>,
}

impl<R> ProfileUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, media: Arc<dyn MediaStore>) -> Self {
        Self { repo, media }
    }

    pub async fn get_by_id(&self, identity_id: &IdentityId) -> AuthResult<Identity> {
        self.repo
            .find_by_id(identity_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn search_by_name(&self, name: &str, page: Page) -> AuthResult<Paged<Identity>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingField("name".to_string()));
        }
        let paged = self.repo.search_by_name(name, page.normalized()).await?;
        if paged.items.is_empty() {
            return Err(AuthError::PageOutOfRange);
        }
        Ok(paged)
    }

    pub async fn update(
        &self,
        identity_id: &IdentityId,
        update: ProfileUpdate,
    ) -> AuthResult<Identity> {
        let mut identity = self.get_by_id(identity_id).await?;

        if let Some(first_name) = update.first_name {
            if first_name.trim().is_empty() {
                return Err(AuthError::Validation(
                    "firstName must not be empty".to_string(),
                ));
            }
            identity.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = update.last_name {
            if last_name.trim().is_empty() {
                return Err(AuthError::Validation(
                    "lastName must not be empty".to_string(),
                ));
            }
            identity.last_name = last_name.trim().to_string();
        }
        if let Some(location) = update.location {
            identity.location = Some(location);
        }
        if let Some((filename, bytes)) = update.thumbnail {
            let object = self.media.upload(bytes, &filename).await?;
            if let Some(old) = identity.set_thumbnail(object.url, object.object_id) {
                // cleanup is best-effort
                if let Err(e) = self.media.destroy(&old).await {
                    tracing::warn!(error = %e, %identity_id, "thumbnail cleanup failed");
                }
            }
        }

        identity.updated_at = chrono::Utc::now();
        self.repo.update(&identity).await?;
        Ok(identity)
    }

    pub async fn delete(&self, identity_id: &IdentityId) -> AuthResult<()> {
        // Fail loudly rather than deleting nothing silently
        let identity = self.get_by_id(identity_id).await?;
        self.repo.delete(identity_id).await?;

        if let Some(object_id) = identity.thumbnail_object_id {
            // cleanup is best-effort
            if let Err(e) = self.media.destroy(&object_id).await {
                tracing::warn!(error = %e, %identity_id, "thumbnail cleanup failed");
            }
        }

        tracing::info!(%identity_id, "identity deleted");
        Ok(())
    }
}
