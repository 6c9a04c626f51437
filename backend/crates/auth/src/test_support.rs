//! Shared test doubles for use case and handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    email::Email,
    identity_id::IdentityId,
    password::RawPassword,
    provider::{OAuthProfile, Provider},
};
use crate::error::AuthResult;
use kernel::page::{Page, Paged};
use platform::mailer::{Mail, MailError, Mailer};
use platform::media::{MediaError, MediaObject, MediaStore};
use platform::token::TokenService;

/// In-memory identity repository
#[derive(Clone, Default)]
pub struct TestIdentityRepository {
    identities: Arc<Mutex<HashMap<IdentityId, Identity>>>,
}

impl IdentityRepository for TestIdentityRepository {
    async fn create(&self, identity: &Identity) -> AuthResult<()> {
        let mut map = self.identities.lock().unwrap();
        map.insert(identity.identity_id.clone(), identity.clone());
        Ok(())
    }

    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>> {
        let map = self.identities.lock().unwrap();
        Ok(map.get(identity_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let map = self.identities.lock().unwrap();
        Ok(map.values().find(|i| &i.email == email).cloned())
    }

    async fn find_by_provider_id(
        &self,
        provider: Provider,
        provider_user_id: &str,
    ) -> AuthResult<Option<Identity>> {
        let map = self.identities.lock().unwrap();
        Ok(map
            .values()
            .find(|i| i.provider_id(provider) == Some(provider_user_id))
            .cloned())
    }

    async fn search_by_name(&self, name: &str, page: Page) -> AuthResult<Paged<Identity>> {
        let needle = name.to_lowercase();
        let map = self.identities.lock().unwrap();
        let mut matches: Vec<Identity> = map
            .values()
            .filter(|i| {
                i.first_name.to_lowercase().contains(&needle)
                    || i.last_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok(Paged { items, page, total })
    }

    async fn update(&self, identity: &Identity) -> AuthResult<()> {
        let mut map = self.identities.lock().unwrap();
        map.insert(identity.identity_id.clone(), identity.clone());
        Ok(())
    }

    async fn delete(&self, identity_id: &IdentityId) -> AuthResult<()> {
        let mut map = self.identities.lock().unwrap();
        map.remove(identity_id);
        Ok(())
    }
}

/// Mailer that records what it was asked to send
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Mail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

/// Media store that remembers which objects it was asked to destroy
#[derive(Default)]
pub struct RecordingMediaStore {
    destroyed: Mutex<Vec<String>>,
}

impl RecordingMediaStore {
    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(&self, _bytes: Vec<u8>, filename: &str) -> Result<MediaObject, MediaError> {
        Ok(MediaObject {
            url: format!("https://cdn.test/{filename}"),
            object_id: format!("test/{filename}"),
        })
    }

    async fn destroy(&self, object_id: &str) -> Result<(), MediaError> {
        self.destroyed.lock().unwrap().push(object_id.to_string());
        Ok(())
    }
}

/// Media store that accepts everything and returns a canned URL
pub struct NullMediaStore;

#[async_trait]
impl MediaStore for NullMediaStore {
    async fn upload(&self, _bytes: Vec<u8>, filename: &str) -> Result<MediaObject, MediaError> {
        Ok(MediaObject {
            url: format!("https://cdn.test/{filename}"),
            object_id: format!("test/{filename}"),
        })
    }

    async fn destroy(&self, _object_id: &str) -> Result<(), MediaError> {
        Ok(())
    }
}

pub fn new_tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new(b"test-secret"))
}

pub fn new_config() -> Arc<AuthConfig> {
    Arc::new(AuthConfig::development())
}

/// Insert a local (password-bearing) identity
pub async fn seed_local(
    repo: &TestIdentityRepository,
    email: &str,
    password: &str,
) -> Identity {
    let raw = RawPassword::new(password).unwrap();
    let identity = Identity::new_local(
        "Ada".to_string(),
        "Lovelace".to_string(),
        Email::new(email).unwrap(),
        &raw,
    )
    .unwrap();
    repo.create(&identity).await.unwrap();
    identity
}

/// Insert a social-only identity linked to Google
pub async fn seed_social(
    repo: &TestIdentityRepository,
    email: &str,
    provider_user_id: &str,
) -> Identity {
    let profile = OAuthProfile {
        provider: Provider::Google,
        provider_user_id: provider_user_id.to_string(),
        email: Email::new(email).unwrap(),
        display_name: Some("Ada Lovelace".to_string()),
        avatar_url: None,
    };
    let identity = Identity::new_from_provider(&profile);
    repo.create(&identity).await.unwrap();
    identity
}
