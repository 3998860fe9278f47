//! Category commands
//!
//! Listing, inspection, and CRUD for article categories.

use super::output::{self, TextTable};
use super::{AppContext, ListArgs};
use crate::models::{ArticleCategory, CreateCategoryInput, UpdateCategoryInput};
use clap::Subcommand;

/// Article category management
#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List categories page by page
    List(ListArgs),

    /// List every category without pagination
    All,

    /// Show a single category
    Show {
        /// Category ID
        id: String,
    },

    /// Create a category
    Create {
        /// Category name
        #[arg(long)]
        name: String,
    },

    /// Rename a category
    Update {
        /// Category ID
        id: String,

        /// New category name
        #[arg(long)]
        name: String,
    },

    /// Delete a category
    Delete {
        /// Category ID
        id: String,
    },
}

/// Execute a category command
pub async fn run(command: CategoryCommand, context: &AppContext) -> anyhow::Result<()> {
    match command {
        CategoryCommand::List(args) => list(&args, context).await,
        CategoryCommand::All => list_all(context).await,
        CategoryCommand::Show { id } => show(&id, context).await,
        CategoryCommand::Create { name } => create(name, context).await,
        CategoryCommand::Update { id, name } => update(&id, name, context).await,
        CategoryCommand::Delete { id } => delete(&id, context).await,
    }
}

async fn list(args: &ListArgs, context: &AppContext) -> anyhow::Result<()> {
    let mut state = args.to_table_state();
    let mut page = context.categories.list(&state.to_query()).await?;

    // A delete may have shrunk the result set below the requested page
    if state.reset_if_out_of_range(page.total_pages()) {
        output::warn(&format!("page {} is out of range, showing page 1", args.page));
        page = context.categories.list(&state.to_query()).await?;
    }

    if page.items.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    println!("{}", render_table(&page.items));
    println!("{}", output::page_footer(&page.pagination));

    Ok(())
}

async fn list_all(context: &AppContext) -> anyhow::Result<()> {
    let categories = context.categories.list_all().await?;

    if categories.is_empty() {
        println!("No categories found.");
        return Ok(());
    }

    println!("{}", render_table(&categories));
    println!("{} categories", categories.len());

    Ok(())
}

async fn show(id: &str, context: &AppContext) -> anyhow::Result<()> {
    let category = context.categories.get_by_id(id).await?;

    println!("ID:   {}", category.id);
    println!("Name: {}", category.name);

    Ok(())
}

async fn create(name: String, context: &AppContext) -> anyhow::Result<()> {
    let category = context
        .categories
        .create(CreateCategoryInput::new(name))
        .await?;

    output::success(&format!(
        "Created category '{}' ({})",
        category.name, category.id
    ));

    Ok(())
}

async fn update(id: &str, name: String, context: &AppContext) -> anyhow::Result<()> {
    let category = context
        .categories
        .update(id, UpdateCategoryInput::new().with_name(name))
        .await?;

    output::success(&format!(
        "Updated category '{}' ({})",
        category.name, category.id
    ));

    Ok(())
}

async fn delete(id: &str, context: &AppContext) -> anyhow::Result<()> {
    context.categories.delete(id).await?;

    output::success(&format!("Deleted category {}", id));

    Ok(())
}

fn render_table(categories: &[ArticleCategory]) -> String {
    let mut table = TextTable::new(&["ID", "NAME"]);
    for category in categories {
        table.add_row(vec![category.id.clone(), category.name.clone()]);
    }
    table.render()
}
