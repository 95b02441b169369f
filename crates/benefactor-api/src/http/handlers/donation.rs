//! Donation page handler.

use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use serde::Deserialize;

use benefactor_core::render::html::{render_notice, render_page, NoticeKind};
use benefactor_core::render::{render_donation_form, RenderContext};

use crate::http::error::AppError;
use crate::http::extractors::session::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DonateQuery {
    /// `failed` after a rejected login attempt.
    #[serde(default)]
    pub login: Option<String>,
    /// `unavailable` after the donation form was submitted.
    #[serde(default)]
    pub donation: Option<String>,
}

/// GET /donate - Render the donation form.
pub async fn show_donation_form(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<DonateQuery>,
) -> Result<Html<String>, AppError> {
    let fields = state.profile_service.fields(&user.context).await?;
    let ctx = RenderContext {
        user: &user.context,
        user_fields: &fields,
        login_url: &state.config.login_url,
    };

    let mut body = String::new();
    if query.login.as_deref() == Some("failed") {
        body.push_str(&render_notice(
            NoticeKind::Error,
            "That email and access code do not match.",
        ));
    }
    if query.donation.as_deref() == Some("unavailable") {
        body.push_str(&render_notice(
            NoticeKind::Error,
            "Online donations are not being taken at the moment.",
        ));
    }
    body.push_str(&render_donation_form(&ctx, &state.hooks));

    Ok(Html(render_page(&state.config.site_name, "Make a Donation", &body)))
}

/// POST /donate - Payments are not processed; send the donor back.
pub async fn submit_donation(user: CurrentUser) -> Redirect {
    tracing::info!(user_id = ?user.context.user_id(), "donation submitted, payments are not processed");
    Redirect::to("/donate?donation=unavailable")
}
