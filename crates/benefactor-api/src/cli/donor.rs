//! `bnfc donor`: create and inspect donor records.

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use benefactor_core::form::location::country_name;
use benefactor_types::donor::{meta, CreateDonorRequest};

use crate::state::AppState;

#[derive(Subcommand)]
pub enum DonorCommand {
    /// Register a new donor.
    Create {
        #[arg(long)]
        email: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,
    },

    /// Show a donor record.
    Show {
        /// Donor email address.
        email: String,
    },
}

pub async fn handle_donor_command(cmd: DonorCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        DonorCommand::Create {
            email,
            first_name,
            last_name,
        } => create_donor(state, email, first_name, last_name, json).await,
        DonorCommand::Show { email } => show_donor(state, &email, json).await,
    }
}

async fn create_donor(
    state: &AppState,
    email: String,
    first_name: String,
    last_name: String,
    json: bool,
) -> Result<()> {
    let donor = state
        .profile_service
        .donors()
        .register(CreateDonorRequest {
            email,
            first_name,
            last_name,
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&donor)?);
    } else {
        println!();
        println!(
            "  {} Registered {} <{}>",
            style("ok").green(),
            style(donor.full_name()).cyan(),
            donor.email,
        );
        println!();
        println!(
            "  Issue an access code with: {}",
            style(format!("bnfc session issue {}", donor.email)).yellow()
        );
        println!();
    }

    Ok(())
}

async fn show_donor(state: &AppState, email: &str, json: bool) -> Result<()> {
    let donor = state
        .profile_service
        .donors()
        .get_by_email(email)
        .await
        .with_context(|| format!("Donor '{email}' not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&donor)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Attribute").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    let user_id = donor.user_id.map(|id| id.to_string()).unwrap_or_default();
    table.add_row(vec![Cell::new("user_id"), Cell::new(user_id)]);
    table.add_row(vec![Cell::new("first_name"), Cell::new(&donor.first_name)]);
    table.add_row(vec![Cell::new("last_name"), Cell::new(&donor.last_name)]);
    table.add_row(vec![Cell::new("email"), Cell::new(&donor.email)]);
    for (key, value) in &donor.meta {
        let shown = match (key.as_str(), country_name(value)) {
            (meta::COUNTRY, Some(name)) => format!("{value} ({name})"),
            _ => value.clone(),
        };
        table.add_row(vec![Cell::new(key), Cell::new(shown)]);
    }
    table.add_row(vec![
        Cell::new("updated_at"),
        Cell::new(donor.updated_at.to_rfc3339()),
    ]);

    println!();
    println!("  {}", style(donor.full_name()).cyan().bold());
    println!();
    println!("{table}");
    println!();

    Ok(())
}
