//! Command-line interface
//!
//! Declares the command tree, wires configuration into the service stack,
//! and dispatches parsed commands to their handlers:
//! - `categories` - article category management
//! - `guestbook` - guestbook moderation
//! - `publications` - publication management
//!
//! Every list command shares the same paging, search, and sort arguments
//! through [`ListArgs`].

pub mod categories;
pub mod guestbook;
pub mod output;
pub mod publications;

use crate::api::{ApiClient, RetryPolicy};
use crate::cache::create_cache;
use crate::config::Config;
use crate::models::{SortOrder, TableState};
use crate::services::{CategoryService, GuestBookService, MarkdownRenderer, PublicationService};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub use categories::CategoryCommand;
pub use guestbook::GuestBookCommand;
pub use publications::PublicationCommand;

/// Admin console for article categories, publications, and the guestbook
#[derive(Debug, Parser)]
#[command(name = "pressroom")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "pressroom.yml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands, one per managed resource
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage article categories
    Categories {
        #[command(subcommand)]
        command: CategoryCommand,
    },

    /// Moderate guestbook entries
    Guestbook {
        #[command(subcommand)]
        command: GuestBookCommand,
    },

    /// Manage publications
    Publications {
        #[command(subcommand)]
        command: PublicationCommand,
    },
}

/// Paging, search, and sort arguments shared by every list command
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page
    #[arg(long, default_value_t = 10)]
    pub limit: u32,

    /// Search term
    #[arg(long)]
    pub search: Option<String>,

    /// Column to sort by
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction (asc or desc), takes effect with --sort-by
    #[arg(long)]
    pub order: Option<SortOrder>,
}

impl ListArgs {
    /// Translate CLI arguments into table state
    ///
    /// The CLI page is 1-based while the table index is 0-based. A direction
    /// without a column is ignored; a column without a direction sorts
    /// ascending.
    pub fn to_table_state(&self) -> TableState {
        TableState {
            page_index: self.page.saturating_sub(1),
            page_size: self.limit,
            sort: self
                .sort_by
                .clone()
                .map(|column| (column, self.order.unwrap_or(SortOrder::Asc))),
            search: self.search.clone(),
        }
    }
}

/// Shared services handed to every command handler
pub struct AppContext {
    pub categories: CategoryService,
    pub guestbook: GuestBookService,
    pub publications: PublicationService,
    pub renderer: MarkdownRenderer,
}

impl AppContext {
    /// Build the service stack from configuration
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache = create_cache(&config.cache).await?;
        let retry = RetryPolicy::from_config(&config.retry);
        let api = Arc::new(ApiClient::new(&config.backend, retry)?);
        let stale_after = Duration::from_secs(config.cache.stale_secs);

        Ok(Self {
            categories: CategoryService::with_stale_after(api.clone(), cache.clone(), stale_after),
            guestbook: GuestBookService::with_stale_after(api.clone(), cache.clone(), stale_after),
            publications: PublicationService::with_stale_after(
                api,
                cache,
                config.upload.clone(),
                stale_after,
            ),
            renderer: MarkdownRenderer::new(),
        })
    }
}

/// Load configuration, build the service stack, and run the parsed command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_with_env(&cli.config)?;
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    let context = AppContext::from_config(&config).await?;

    match cli.command {
        Command::Categories { command } => categories::run(command, &context).await,
        Command::Guestbook { command } => guestbook::run(command, &context).await,
        Command::Publications { command } => publications::run(command, &context).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories_list_with_flags() {
        let cli = Cli::try_parse_from([
            "pressroom",
            "categories",
            "list",
            "--page",
            "3",
            "--limit",
            "25",
            "--search",
            "press",
            "--sort-by",
            "name",
            "--order",
            "desc",
        ])
        .expect("arguments should parse");

        match cli.command {
            Command::Categories {
                command: CategoryCommand::List(args),
            } => {
                assert_eq!(args.page, 3);
                assert_eq!(args.limit, 25);
                assert_eq!(args.search.as_deref(), Some("press"));
                assert_eq!(args.sort_by.as_deref(), Some("name"));
                assert_eq!(args.order, Some(SortOrder::Desc));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_path_defaults_and_overrides() {
        let cli = Cli::try_parse_from(["pressroom", "guestbook", "list"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("pressroom.yml"));

        let cli = Cli::try_parse_from([
            "pressroom",
            "guestbook",
            "list",
            "--config",
            "staging.yml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("staging.yml"));
    }

    #[test]
    fn test_invalid_order_is_rejected() {
        let result = Cli::try_parse_from([
            "pressroom",
            "categories",
            "list",
            "--sort-by",
            "name",
            "--order",
            "upward",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_args_translate_to_table_state() {
        let args = ListArgs {
            page: 3,
            limit: 25,
            search: Some("press".to_string()),
            sort_by: Some("name".to_string()),
            order: Some(SortOrder::Desc),
        };

        let state = args.to_table_state();
        assert_eq!(state.page_index, 2);
        assert_eq!(state.page_size, 25);
        assert_eq!(state.sort, Some(("name".to_string(), SortOrder::Desc)));
        assert_eq!(state.search.as_deref(), Some("press"));
    }

    #[test]
    fn test_first_page_maps_to_index_zero() {
        let args = ListArgs {
            page: 1,
            limit: 10,
            search: None,
            sort_by: None,
            order: None,
        };
        assert_eq!(args.to_table_state().page_index, 0);

        // Page 0 is treated as page 1 instead of underflowing
        let args = ListArgs {
            page: 0,
            limit: 10,
            search: None,
            sort_by: None,
            order: None,
        };
        assert_eq!(args.to_table_state().page_index, 0);
    }

    #[test]
    fn test_order_without_column_is_ignored() {
        let args = ListArgs {
            page: 1,
            limit: 10,
            search: None,
            sort_by: None,
            order: Some(SortOrder::Desc),
        };

        let state = args.to_table_state();
        assert!(state.sort.is_none());
        assert!(state.to_query().sort_order.is_none());
    }

    #[test]
    fn test_column_without_order_sorts_ascending() {
        let args = ListArgs {
            page: 1,
            limit: 10,
            search: None,
            sort_by: Some("created_at".to_string()),
            order: None,
        };

        let state = args.to_table_state();
        assert_eq!(state.sort, Some(("created_at".to_string(), SortOrder::Asc)));
    }
}
