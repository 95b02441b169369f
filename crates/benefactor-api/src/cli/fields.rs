//! `bnfc fields`: print the assembled profile form.

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use benefactor_types::donor::UserContext;

use crate::state::AppState;

/// Print the field groups a visitor would see, in render order.
pub async fn show_fields(state: &AppState, email: Option<&str>, json: bool) -> Result<()> {
    let user = match email {
        Some(email) => {
            let donor = state
                .profile_service
                .donors()
                .get_by_email(email)
                .await
                .with_context(|| format!("Donor '{email}' not found"))?;
            donor
                .user_id
                .map(UserContext::Authenticated)
                .unwrap_or(UserContext::Anonymous)
        }
        None => UserContext::Anonymous,
    };

    let groups = state.profile_service.fields(&user).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Group").fg(Color::Cyan),
            Cell::new("Key").fg(Color::Cyan),
            Cell::new("Label").fg(Color::Cyan),
            Cell::new("Type").fg(Color::Cyan),
            Cell::new("Priority").fg(Color::Cyan),
            Cell::new("Required").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    for (group_key, group) in groups.iter() {
        for (key, field) in group.fields.iter() {
            table.add_row(vec![
                Cell::new(group_key),
                Cell::new(key),
                Cell::new(&field.label),
                Cell::new(field.field_type.as_str()),
                Cell::new(field.priority),
                Cell::new(if field.required { "yes" } else { "" }),
                Cell::new(&field.value),
            ]);
        }
    }

    println!();
    match email {
        Some(email) => println!("  Profile fields for {}", style(email).cyan()),
        None => println!("  Profile fields for {}", style("an anonymous visitor").dim()),
    }
    println!();
    println!("{table}");
    println!();

    Ok(())
}
