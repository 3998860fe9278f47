//! Publication commands
//!
//! Listing, inspection, and CRUD for publications. Content is read from a
//! file and rendered from markdown to HTML before submission unless `--html`
//! says the file already is HTML. The cover image rides along as multipart
//! form data.

use super::output::{self, TextTable};
use super::{AppContext, ListArgs};
use crate::models::{
    CreatePublicationInput, ImageUpload, Language, Publication, PublicationKind,
    PublicationListQuery, TableState, UpdatePublicationInput,
};
use crate::services::MarkdownRenderer;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

/// Publication management
#[derive(Debug, Subcommand)]
pub enum PublicationCommand {
    /// List publications page by page
    List(PublicationListArgs),

    /// Show a single publication
    Show {
        /// Publication ID
        id: String,
    },

    /// Create a publication
    Create(CreateArgs),

    /// Update a publication
    Update(UpdateArgs),

    /// Delete a publication
    Delete {
        /// Publication ID
        id: String,
    },

    /// Render a markdown file to HTML without touching the backend
    Preview {
        /// Markdown file to render
        content: PathBuf,
    },
}

/// List arguments with the publication-specific filters
#[derive(Debug, Args)]
pub struct PublicationListArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Filter by content language (id or en)
    #[arg(long)]
    pub lang: Option<Language>,

    /// Filter by publication type (News or Article)
    #[arg(long = "type")]
    pub kind: Option<PublicationKind>,
}

impl PublicationListArgs {
    fn to_query(&self, state: &TableState) -> PublicationListQuery {
        let mut query = PublicationListQuery::new(state.to_query());
        if let Some(language) = self.lang {
            query = query.with_language(language);
        }
        if let Some(kind) = self.kind {
            query = query.with_kind(kind);
        }
        query
    }
}

/// Arguments for creating a publication
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Publication title
    #[arg(long)]
    pub title: String,

    /// File holding the content (markdown unless --html)
    #[arg(long)]
    pub content: PathBuf,

    /// Publication date (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: DateTime<Utc>,

    /// Linked category ID, repeatable
    #[arg(long = "category-id")]
    pub category_ids: Vec<String>,

    /// Publication type (News or Article)
    #[arg(long = "type", default_value = "News")]
    pub kind: PublicationKind,

    /// Cover image file
    #[arg(long)]
    pub image: PathBuf,

    /// Treat the content file as ready-made HTML instead of markdown
    #[arg(long)]
    pub html: bool,
}

/// Arguments for updating a publication; unset fields keep their value
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Publication ID
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// File holding the new content (markdown unless --html)
    #[arg(long)]
    pub content: Option<PathBuf>,

    /// New publication date (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<DateTime<Utc>>,

    /// Replacement category ID, repeatable; replaces the whole set
    #[arg(long = "category-id")]
    pub category_ids: Vec<String>,

    /// New publication type (News or Article)
    #[arg(long = "type")]
    pub kind: Option<PublicationKind>,

    /// Replacement cover image file
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Treat the content file as ready-made HTML instead of markdown
    #[arg(long)]
    pub html: bool,
}

/// Execute a publication command
pub async fn run(command: PublicationCommand, context: &AppContext) -> anyhow::Result<()> {
    match command {
        PublicationCommand::List(args) => list(&args, context).await,
        PublicationCommand::Show { id } => show(&id, context).await,
        PublicationCommand::Create(args) => create(args, context).await,
        PublicationCommand::Update(args) => update(args, context).await,
        PublicationCommand::Delete { id } => delete(&id, context).await,
        PublicationCommand::Preview { content } => preview(&content, &context.renderer).await,
    }
}

async fn list(args: &PublicationListArgs, context: &AppContext) -> anyhow::Result<()> {
    let mut state = args.list.to_table_state();
    let mut page = context.publications.list(&args.to_query(&state)).await?;

    // A delete may have shrunk the result set below the requested page
    if state.reset_if_out_of_range(page.total_pages()) {
        output::warn(&format!(
            "page {} is out of range, showing page 1",
            args.list.page
        ));
        page = context.publications.list(&args.to_query(&state)).await?;
    }

    if page.items.is_empty() {
        println!("No publications found.");
        return Ok(());
    }

    println!("{}", render_table(&page.items));
    println!("{}", output::page_footer(&page.pagination));

    Ok(())
}

async fn show(id: &str, context: &AppContext) -> anyhow::Result<()> {
    let publication = context.publications.get_by_id(id).await?;

    println!("ID:         {}", publication.id);
    println!("Slug:       {}", publication.slug);
    println!("Title:      {}", publication.title);
    println!("Type:       {}", publication.kind);
    println!("Language:   {}", publication.language);
    println!("Date:       {}", publication.date.format("%Y-%m-%d"));
    println!("Categories: {}", category_names(&publication));
    println!("Image:      {}", publication.image.as_deref().unwrap_or("-"));
    println!("Created:    {}", publication.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated:    {}", publication.updated_at.format("%Y-%m-%d %H:%M"));
    println!();
    println!("{}", publication.content);

    Ok(())
}

async fn create(args: CreateArgs, context: &AppContext) -> anyhow::Result<()> {
    let content = load_content(&args.content, args.html, &context.renderer).await?;
    let image = load_image(&args.image).await?;

    let input = CreatePublicationInput::new(args.title, content, args.date, args.kind)
        .with_categories(args.category_ids)
        .with_image(image);

    let publication = context.publications.create(input).await?;

    output::success(&format!(
        "Created publication '{}' ({})",
        publication.title, publication.id
    ));

    Ok(())
}

async fn update(args: UpdateArgs, context: &AppContext) -> anyhow::Result<()> {
    let UpdateArgs {
        id,
        title,
        content,
        date,
        category_ids,
        kind,
        image,
        html,
    } = args;

    let mut input = UpdatePublicationInput::new();
    if let Some(title) = title {
        input = input.with_title(title);
    }
    if let Some(path) = content {
        input = input.with_content(load_content(&path, html, &context.renderer).await?);
    }
    if let Some(date) = date {
        input = input.with_date(date);
    }
    if !category_ids.is_empty() {
        input = input.with_categories(category_ids);
    }
    if let Some(kind) = kind {
        input = input.with_kind(kind);
    }
    if let Some(path) = image {
        input = input.with_image(load_image(&path).await?);
    }

    if !input.has_changes() {
        output::warn("Nothing to update, pass at least one field");
        return Ok(());
    }

    let publication = context.publications.update(&id, input).await?;

    output::success(&format!(
        "Updated publication '{}' ({})",
        publication.title, publication.id
    ));

    Ok(())
}

async fn delete(id: &str, context: &AppContext) -> anyhow::Result<()> {
    context.publications.delete(id).await?;

    output::success(&format!("Deleted publication {}", id));

    Ok(())
}

async fn preview(path: &Path, renderer: &MarkdownRenderer) -> anyhow::Result<()> {
    let markdown = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    println!("{}", renderer.render(&markdown));

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse an RFC 3339 timestamp or a bare YYYY-MM-DD date (midnight UTC)
fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
        .ok_or_else(|| format!("invalid date '{}', expected RFC 3339 or YYYY-MM-DD", value))
}

/// Read a content file, rendering markdown to HTML unless told otherwise
async fn load_content(
    path: &Path,
    as_html: bool,
    renderer: &MarkdownRenderer,
) -> anyhow::Result<String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read content file {}", path.display()))?;

    if as_html {
        Ok(text)
    } else {
        Ok(renderer.render(&text))
    }
}

/// Read a cover image file, guessing the MIME type from its extension
async fn load_image(path: &Path) -> anyhow::Result<ImageUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read image file {}", path.display()))?;

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();
    let content_type = ImageUpload::mime_from_filename(&filename)
        .unwrap_or("application/octet-stream")
        .to_string();

    Ok(ImageUpload::new(filename, content_type, bytes))
}

/// Resolved category names, falling back to raw IDs, then "-"
fn category_names(publication: &Publication) -> String {
    if let Some(ref categories) = publication.categories {
        if !categories.is_empty() {
            return categories
                .iter()
                .map(|category| category.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
        }
    }
    match publication.category_ids {
        Some(ref ids) if !ids.is_empty() => ids.join(", "),
        _ => "-".to_string(),
    }
}

fn render_table(publications: &[Publication]) -> String {
    let mut table = TextTable::new(&["ID", "TITLE", "TYPE", "LANG", "DATE"]);
    for publication in publications {
        table.add_row(vec![
            publication.id.clone(),
            output::truncate(&publication.title, 40),
            publication.kind.to_string(),
            publication.language.to_string(),
            publication.date.format("%Y-%m-%d").to_string(),
        ]);
    }
    table.render()
}
