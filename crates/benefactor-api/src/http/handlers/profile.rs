//! Profile page handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use benefactor_core::form::profile::{ACTION_FIELD, FORM_ACTION};
use benefactor_core::render::html::{render_notice, render_page, NoticeKind};
use benefactor_core::render::{render_login_prompt, render_profile_form, RenderContext};
use benefactor_types::error::ProfileError;
use benefactor_types::submission::{Submission, SubmissionOutcome};

use crate::http::error::AppError;
use crate::http::extractors::session::CurrentUser;
use crate::state::AppState;

const PAGE_TITLE: &str = "Your Profile";

/// Query string of the profile page.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    /// Set after a successful update.
    #[serde(default)]
    pub updated: Option<u8>,
}

/// GET /profile - Render the profile form for the current visitor.
pub async fn show_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ProfileQuery>,
) -> Result<Html<String>, AppError> {
    let notice = query
        .updated
        .map(|_| render_notice(NoticeKind::Success, "Your profile has been updated."));
    let body = profile_body(&state, &user, notice, None).await?;
    Ok(Html(render_page(&state.config.site_name, PAGE_TITLE, &body)))
}

/// POST /profile - Apply a profile submission.
///
/// Redirects back to the profile page on update or when the submission is
/// ignored. Validation failures re-render the form, holding the submitted
/// values, with a 422 status.
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(submission): Form<Submission>,
) -> Result<Response, AppError> {
    if submission.get(ACTION_FIELD) != Some(FORM_ACTION) {
        tracing::debug!("profile POST without the update action");
        return Ok(Redirect::to("/profile").into_response());
    }

    let result = state
        .profile_service
        .update_profile(&user.context, &user.binding(), &submission)
        .await;

    match result {
        Ok(SubmissionOutcome::Updated { .. }) => Ok(Redirect::to("/profile?updated=1").into_response()),
        Ok(SubmissionOutcome::Ignored { .. }) => Ok(Redirect::to("/profile").into_response()),
        Err(
            e @ (ProfileError::Validation { .. }
            | ProfileError::InvalidChoice { .. }
            | ProfileError::InvalidEmail(_)
            | ProfileError::EmailConflict(_)),
        ) => {
            let notice = render_notice(NoticeKind::Error, &e.to_string());
            let body = profile_body(&state, &user, Some(notice), Some(&submission)).await?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_page(&state.config.site_name, PAGE_TITLE, &body)),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

async fn profile_body(
    state: &AppState,
    user: &CurrentUser,
    notice: Option<String>,
    submitted: Option<&Submission>,
) -> Result<String, AppError> {
    let fields = match submitted {
        Some(submission) => state.profile_service.refill(&user.context, submission).await?,
        None => state.profile_service.fields(&user.context).await?,
    };
    let nonce = state.profile_service.issue_nonce(&user.binding());

    let mut body = notice.unwrap_or_default();
    body.push_str(&render_login_prompt(&RenderContext {
        user: &user.context,
        user_fields: &fields,
        login_url: &state.config.login_url,
    }));
    body.push_str(&render_profile_form(&fields, &nonce));
    Ok(body)
}
