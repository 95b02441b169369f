//! Login and logout handlers.
//!
//! Donors log in with their email and an access code. The access code is a
//! session token minted by `bnfc session issue`; logging in stores it in the
//! session cookie once it is confirmed to belong to that email's donor.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use benefactor_core::repository::session::SessionRepository;
use benefactor_types::error::DonorError;

use crate::http::error::AppError;
use crate::http::extractors::session::{expired_session_cookie, session_cookie, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub code: String,
}

/// POST /login - Check the access code and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let code = form.code.trim();

    let donor = match state.profile_service.donors().get_by_email(&form.email).await {
        Ok(donor) => Some(donor),
        Err(DonorError::NotFound) => None,
        Err(e) => return Err(e.into()),
    };
    let session_user = if code.is_empty() {
        None
    } else {
        state.sessions.resolve(code).await?
    };

    match (donor.and_then(|d| d.user_id), session_user) {
        (Some(donor_id), Some(session_id)) if donor_id == session_id => {
            tracing::info!(user_id = %donor_id, "donor logged in");
            Ok((
                [(SET_COOKIE, session_cookie(code))],
                Redirect::to("/donate"),
            )
                .into_response())
        }
        _ => {
            tracing::info!("rejected login attempt");
            Ok(Redirect::to("/donate?login=failed").into_response())
        }
    }
}

/// POST /logout - Revoke the current session and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    if let Some(token) = &user.token {
        state.sessions.revoke(token).await?;
        tracing::info!(user_id = ?user.context.user_id(), "donor logged out");
    }
    Ok((
        [(SET_COOKIE, expired_session_cookie())],
        Redirect::to("/donate"),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;
    use axum::http::StatusCode;

    use crate::state::tests::{register, seeded};

    fn form(email: &str, code: &str) -> Form<LoginForm> {
        Form(LoginForm {
            email: email.to_string(),
            code: code.to_string(),
        })
    }

    fn location(response: &Response) -> &str {
        response.headers().get(LOCATION).unwrap().to_str().unwrap()
    }

    #[tokio::test]
    async fn test_login_with_own_code_sets_cookie() {
        let seeded = seeded().await;
        let response = login(
            State(seeded.state.clone()),
            form(" ADA@example.org", &format!(" {} ", seeded.token)),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/donate");
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert_eq!(cookie, session_cookie(&seeded.token));
    }

    #[tokio::test]
    async fn test_login_with_other_donors_code_fails() {
        let seeded = seeded().await;
        let grace = register(&seeded.state, "grace@example.org", "Grace", "Hopper").await;
        let grace_token = seeded.state.sessions.create(&grace).await.unwrap();

        let response = login(State(seeded.state.clone()), form("ada@example.org", &grace_token))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/donate?login=failed");
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_login_with_unknown_email_or_bad_code_fails() {
        let seeded = seeded().await;
        for (email, code) in [
            ("nobody@example.org", seeded.token.as_str()),
            ("ada@example.org", "not-a-session"),
            ("ada@example.org", "  "),
        ] {
            let response = login(State(seeded.state.clone()), form(email, code))
                .await
                .unwrap();
            assert_eq!(location(&response), "/donate?login=failed");
            assert!(response.headers().get(SET_COOKIE).is_none());
        }
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let seeded = seeded().await;
        let response = logout(State(seeded.state.clone()), seeded.current_user())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert_eq!(cookie, expired_session_cookie());
        assert!(seeded.state.sessions.resolve(&seeded.token).await.unwrap().is_none());
    }
}
