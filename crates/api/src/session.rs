//! Sign-in state on top of the persisted account and token stores.

use chrono::Utc;
use domain::models::{Account, LoginRequest, Role};
use persistence::AppState;
use shared::jwt::{is_token_expired, peek_claims};
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::endpoints::{member, RequestOptions};
use crate::error::ApiError;

/// The signed-in user, as far as this client knows.
///
/// Clones share the underlying stores, so a login through one clone is
/// visible to every other.
#[derive(Debug, Clone)]
pub struct Session {
    client: ApiClient,
    state: AppState,
}

impl Session {
    pub fn new(client: ApiClient, state: AppState) -> Self {
        Self { client, state }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Logs in and stores the token and account.
    ///
    /// When the login body carries no account, the identity is read from
    /// the token claims instead, falling back to the email.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, ApiError> {
        let credentials = LoginRequest::new(email.trim(), password);
        let response = member::login(&self.client, &credentials)
            .await?
            .ok_or(ApiError::NotAuthenticated)?;

        let account = response
            .account
            .unwrap_or_else(|| account_from_token(&response.token, &credentials.email));

        self.state.sign_in(response.token, Some(account.clone()))?;
        info!(member = %account.id, role = %account.role, "Signed in");
        Ok(account)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        let who = self.state.account.get().map(|account| account.id);
        self.state.sign_out()?;
        info!(member = who.as_deref().unwrap_or("-"), "Signed out");
        Ok(())
    }

    pub fn whoami(&self) -> Option<Account> {
        self.state.account.get()
    }

    /// The cached bearer token.
    ///
    /// A locally expired token is still returned; the backend decides.
    pub fn token(&self) -> Result<String, ApiError> {
        let token = self.state.bearer().ok_or(ApiError::NotAuthenticated)?;
        if is_token_expired(&token, Utc::now()) {
            warn!("Cached token has expired; the backend will likely reject it");
        }
        Ok(token)
    }

    /// Request options carrying the cached token.
    pub fn options(&self) -> Result<RequestOptions, ApiError> {
        self.token().map(RequestOptions::authorized)
    }
}

fn account_from_token(token: &str, email: &str) -> Account {
    match peek_claims(token) {
        Ok(claims) => {
            let id = claims.sub.unwrap_or_else(|| email.to_string());
            Account {
                name: claims.name.unwrap_or_else(|| id.clone()),
                role: claims.role.as_deref().map(Role::parse).unwrap_or_default(),
                id,
            }
        }
        Err(e) => {
            warn!(error = %e, "Token claims unreadable; using the login email as identity");
            Account {
                id: email.to_string(),
                name: email.to_string(),
                role: Role::default(),
            }
        }
    }
}
