//! Login, registration and logout.

use crate::session::SessionStore;
use thiserror::Error;
use tracing::info;
use ventasimple_client::{ApiClient, ApiError};

/// Errors from the login and registration flows.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend accepted the credentials but sent no token.
    #[error("login response did not include a token")]
    MissingToken,

    /// The session holds no token.
    #[error("not signed in")]
    NotSignedIn,
}

impl AuthError {
    /// Text suitable for a user-facing notice.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Signs in and stores the returned token.
pub async fn login(
    client: &ApiClient,
    session: &SessionStore,
    email: &str,
    password: &str,
) -> Result<String, AuthError> {
    let response = client.login(email.trim(), password).await?;
    let token = response
        .token
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;
    session.set_token(token.clone());
    info!("signed in");
    Ok(token)
}

/// Creates the account, then signs in with the same credentials.
pub async fn register_and_login(
    client: &ApiClient,
    session: &SessionStore,
    email: &str,
    password: &str,
) -> Result<String, AuthError> {
    client.register(email.trim(), password).await?;
    info!("account registered");
    login(client, session, email, password).await
}

/// Clears the session token.
pub fn logout(session: &SessionStore) {
    session.clear_token();
    info!("signed out");
}
