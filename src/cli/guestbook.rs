//! Guestbook commands
//!
//! Listing, inspection, and removal of visitor guestbook entries. Entries
//! are created on the public site, so there is no create or update command.

use super::output::{self, TextTable};
use super::{AppContext, ListArgs};
use crate::models::GuestBookEntry;
use clap::Subcommand;

/// Guestbook moderation
#[derive(Debug, Subcommand)]
pub enum GuestBookCommand {
    /// List guestbook entries page by page
    List(ListArgs),

    /// Show a single entry
    Show {
        /// Entry ID
        id: String,
    },

    /// Delete an entry
    Delete {
        /// Entry ID
        id: String,
    },
}

/// Execute a guestbook command
pub async fn run(command: GuestBookCommand, context: &AppContext) -> anyhow::Result<()> {
    match command {
        GuestBookCommand::List(args) => list(&args, context).await,
        GuestBookCommand::Show { id } => show(&id, context).await,
        GuestBookCommand::Delete { id } => delete(&id, context).await,
    }
}

async fn list(args: &ListArgs, context: &AppContext) -> anyhow::Result<()> {
    let mut state = args.to_table_state();
    let mut page = context.guestbook.list(&state.to_query()).await?;

    // A delete may have shrunk the result set below the requested page
    if state.reset_if_out_of_range(page.total_pages()) {
        output::warn(&format!("page {} is out of range, showing page 1", args.page));
        page = context.guestbook.list(&state.to_query()).await?;
    }

    if page.items.is_empty() {
        println!("No guestbook entries found.");
        return Ok(());
    }

    println!("{}", render_table(&page.items));
    println!("{}", output::page_footer(&page.pagination));

    Ok(())
}

async fn show(id: &str, context: &AppContext) -> anyhow::Result<()> {
    let entry = context.guestbook.get_by_id(id).await?;

    println!("ID:        {}", entry.id);
    println!("Name:      {}", entry.name);
    println!("Origin:    {}", entry.origin);
    println!("Purpose:   {}", entry.purpose);
    println!("Selfie:    {}", entry.selfie_image.as_deref().unwrap_or("-"));
    println!("Signature: {}", entry.signature_image.as_deref().unwrap_or("-"));
    println!("Created:   {}", entry.created_at.format("%Y-%m-%d %H:%M"));

    Ok(())
}

async fn delete(id: &str, context: &AppContext) -> anyhow::Result<()> {
    context.guestbook.delete(id).await?;

    output::success(&format!("Deleted guestbook entry {}", id));

    Ok(())
}

fn render_table(entries: &[GuestBookEntry]) -> String {
    let mut table = TextTable::new(&["ID", "NAME", "ORIGIN", "PURPOSE", "CREATED"]);
    for entry in entries {
        table.add_row(vec![
            entry.id.clone(),
            entry.name.clone(),
            entry.origin.clone(),
            output::truncate(&entry.purpose, 30),
            entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    table.render()
}
