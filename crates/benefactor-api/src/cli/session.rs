//! `bnfc session`: mint and revoke access codes.

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;

use benefactor_core::repository::session::SessionRepository;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Issue an access code for a donor.
    Issue {
        /// Donor email address.
        email: String,
    },

    /// Revoke an access code.
    Revoke {
        token: String,
    },
}

pub async fn handle_session_command(
    cmd: SessionCommand,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match cmd {
        SessionCommand::Issue { email } => issue(state, &email, json).await,
        SessionCommand::Revoke { token } => revoke(state, &token, json).await,
    }
}

async fn issue(state: &AppState, email: &str, json: bool) -> Result<()> {
    let donor = state
        .profile_service
        .donors()
        .get_by_email(email)
        .await
        .with_context(|| format!("Donor '{email}' not found"))?;
    let user_id = donor
        .user_id
        .with_context(|| format!("Donor '{email}' has no user id"))?;

    let token = state.sessions.create(&user_id).await?;

    if json {
        let result = serde_json::json!({
            "email": donor.email,
            "user_id": user_id.to_string(),
            "token": token,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Access code for {} (shown once):",
            style("ok").green(),
            style(&donor.email).cyan()
        );
        println!();
        println!("  {}", style(&token).yellow().bold());
        println!();
    }

    Ok(())
}

async fn revoke(state: &AppState, token: &str, json: bool) -> Result<()> {
    state.sessions.revoke(token).await?;

    if json {
        println!("{}", serde_json::json!({ "revoked": true }));
    } else {
        println!();
        println!("  {} Access code revoked", style("ok").green());
        println!();
    }

    Ok(())
}
