//! Session cookie extractor.
//!
//! Resolves the `benefactor_session` cookie to the current user. A missing,
//! malformed, or unknown cookie means the visitor is anonymous.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;

use benefactor_core::repository::session::SessionRepository;
use benefactor_core::service::nonce::NonceBinding;
use benefactor_types::donor::UserContext;

use crate::http::error::AppError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "benefactor_session";

/// The visitor behind a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub context: UserContext,
    /// Session token, present only when it resolved to a user.
    pub token: Option<String>,
}

impl CurrentUser {
    pub fn anonymous() -> Self {
        Self {
            context: UserContext::Anonymous,
            token: None,
        }
    }

    /// What nonces issued to this visitor are bound to.
    pub fn binding(&self) -> NonceBinding {
        NonceBinding::new(
            self.context.user_id(),
            self.token.clone().unwrap_or_default(),
        )
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts) else {
            return Ok(CurrentUser::anonymous());
        };

        match state.sessions.resolve(&token).await? {
            Some(user_id) => Ok(CurrentUser {
                context: UserContext::Authenticated(user_id),
                token: Some(token),
            }),
            None => {
                tracing::debug!("unknown session cookie, treating visitor as anonymous");
                Ok(CurrentUser::anonymous())
            }
        }
    }
}

/// Value of the session cookie, if the request carries one.
fn session_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| cookie_value(header, SESSION_COOKIE))
}

/// Find `name` in a `Cookie` header value.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value that stores `token`.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value that clears the session cookie.
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
