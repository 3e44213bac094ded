//! In-memory `AppState` and a scripted auth provider for handler and router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth_client::{AuthError, AuthProvider, AuthUser, OAuthProvider, SignUpOutcome};
use crate::config::{Backend, Config};
use crate::models::job::JobListing;
use crate::models::profile::{Profile, UserRole};
use crate::repo::{MemoryRepository, ProfileRepository, Repositories};
use crate::session::{new_session_token, CurrentUser, MemorySessionStore, SessionStore};
use crate::state::AppState;
use crate::storage::MemoryObjectStore;

pub const STORAGE_BASE_URL: &str = "http://storage.test/documents";

/// Accepts any sign-up with a new email; access tokens are `token-<user id>`.
#[derive(Default)]
pub struct FakeAuthProvider {
    accounts: Mutex<HashMap<String, (String, AuthUser)>>,
    /// When set, sign-ups come back unconfirmed.
    require_confirmation: bool,
}

impl FakeAuthProvider {
    pub fn requiring_confirmation() -> Self {
        Self {
            require_confirmation: true,
            ..Self::default()
        }
    }

    pub fn access_token(user_id: Uuid) -> String {
        format!("token-{user_id}")
    }

    fn rejected(status: u16, message: &str) -> AuthError {
        AuthError::Rejected {
            status,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<SignUpOutcome, AuthError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(Self::rejected(422, "User already registered"));
        }
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: Some(name.to_string()),
            role: Some(role),
            avatar_url: None,
        };
        accounts.insert(email.to_string(), (password.to_string(), user.clone()));
        if self.require_confirmation {
            Ok(SignUpOutcome::ConfirmationRequired(user))
        } else {
            Ok(SignUpOutcome::SignedIn(user))
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(String, AuthUser), AuthError> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some((stored, user)) if stored == password => {
                Ok((Self::access_token(user.id), user.clone()))
            }
            _ => Err(Self::rejected(400, "Invalid login credentials")),
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let accounts = self.accounts.lock().unwrap();
        accounts
            .values()
            .map(|(_, user)| user)
            .find(|user| Self::access_token(user.id) == access_token)
            .cloned()
            .ok_or_else(|| Self::rejected(401, "invalid JWT"))
    }

    fn oauth_authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> Result<String, AuthError> {
        Ok(format!(
            "http://auth.test/authorize?provider={}&redirect_to={redirect_to}",
            provider.as_str()
        ))
    }
}

pub fn test_config() -> Config {
    Config {
        backend: Backend::Memory,
        auth_url: "http://auth.test".to_string(),
        auth_api_key: "test-key".to_string(),
        session_ttl_secs: 3600,
        max_upload_bytes: 1024 * 1024,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

/// Typed handles to everything behind a test `AppState`.
pub struct TestApp {
    pub state: AppState,
    pub repo: MemoryRepository,
    pub storage: MemoryObjectStore,
    pub sessions: MemorySessionStore,
}

impl TestApp {
    pub fn new(jobs: Vec<JobListing>) -> Self {
        Self::with_auth(jobs, FakeAuthProvider::default())
    }

    pub fn with_auth(jobs: Vec<JobListing>, auth: FakeAuthProvider) -> Self {
        let repo = MemoryRepository::with_jobs(jobs);
        let storage = MemoryObjectStore::new(STORAGE_BASE_URL);
        let config = test_config();
        let sessions = MemorySessionStore::new(config.session_ttl_secs);
        let state = AppState {
            repos: Repositories::memory(repo.clone()),
            storage: Arc::new(storage.clone()),
            sessions: Arc::new(sessions.clone()),
            auth: Arc::new(auth),
            config,
        };
        Self {
            state,
            repo,
            storage,
            sessions,
        }
    }

    /// Creates a profile and an open session; returns the bearer token.
    pub async fn sign_in_as(&self, role: UserRole) -> (String, CurrentUser) {
        let id = Uuid::new_v4();
        let profile = Profile {
            id,
            email: format!("{id}@example.com"),
            name: format!("{role} {}", &id.simple().to_string()[..6]),
            user_role: role,
            avatar_url: None,
        };
        self.repo.upsert_profile(&profile).await.unwrap();
        let user = CurrentUser::from(&profile);
        let token = new_session_token();
        self.sessions.save(&token, &user).await.unwrap();
        (token, user)
    }
}
