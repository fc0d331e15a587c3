use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use core_types::{
    AuthorEdition, Condition, EditionCollection, NewAuthor, NewCollection, NewEdition, NewRecord,
    Patch, SearchCriteria, Table,
};
use database::{CatalogStore, DbError};
use std::path::PathBuf;
use tracing::info;
use view::{OutputFormat, View};

mod view;

/// The main entry point for the catalog command-line tool.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    let _log_guard = configuration::init_tracing(&config.logging)?;

    // Open the single catalog connection and make sure the tables exist.
    let mut store = CatalogStore::connect(&config.database)
        .await
        .context("failed to connect to the catalog database")?;
    let view = View::new(cli.format);

    // A failed command is reported and the session ends normally; a failed
    // bootstrap is a startup failure.
    let bootstrap = match store.bootstrap_schema().await {
        Ok(outcome) if matches!(cli.command, Commands::Init) => {
            view.show_outcome(&outcome);
            Ok(())
        }
        Ok(_) => {
            if let Err(e) = handle_command(cli.command, &mut store, &view).await {
                view.show_error(&e);
            }
            Ok(())
        }
        Err(e) => Err(e),
    };

    store.close().await?;
    info!("connection closed");
    bootstrap.context("failed to create the catalog tables")
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Maintains the library catalog: authors, collections, editions and their links.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// How rows, search results and status messages are printed.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Configuration file; missing files fall back to defaults and CATALOG__* variables.
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the catalog tables if they do not exist yet.
    Init,
    /// Print every row of a table.
    List { table: Table },
    /// Print the number of rows in a table.
    Count { table: Table },
    /// Insert one row.
    #[command(subcommand)]
    Add(AddCommand),
    /// Change rows matching one `column=value` condition.
    Update {
        table: Table,
        /// A `column=value` assignment; repeat for several columns.
        #[arg(long = "set")]
        assignments: Vec<String>,
        /// The `column=value` condition selecting the rows to change.
        #[arg(long = "where")]
        condition: Option<String>,
    },
    /// Delete rows matching every given `column=value` condition.
    Delete {
        table: Table,
        #[arg(long = "where", required = true)]
        conditions: Vec<String>,
    },
    /// Insert random rows for testing.
    Generate { table: Table, count: usize },
    /// Search authors' editions and the collections they appear in.
    Search(SearchArgs),
}

#[derive(Subcommand)]
enum AddCommand {
    Author {
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
    },
    Collection {
        #[arg(long)]
        name: String,
        /// Category tag (e.g. "Poetry").
        #[arg(long = "type")]
        kind: String,
        /// Medium tag (e.g. "Paper").
        #[arg(long)]
        view: String,
    },
    Edition {
        #[arg(long)]
        name: String,
        #[arg(long)]
        branch: String,
        #[arg(long)]
        pages: i32,
        #[arg(long)]
        languages: String,
    },
    AuthorEdition {
        #[arg(long)]
        author_id: i32,
        #[arg(long)]
        edition_id: i32,
    },
    EditionCollection {
        #[arg(long)]
        edition_id: i32,
        #[arg(long)]
        collection_id: i32,
        /// The date the edition joined the collection (format: YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Parser)]
struct SearchArgs {
    /// Case-insensitive fragment of the author's surname.
    #[arg(long)]
    surname: String,

    #[arg(long)]
    min_pages: i32,

    #[arg(long)]
    max_pages: i32,

    /// Earliest collection date (format: YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,

    /// Latest collection date (format: YYYY-MM-DD).
    #[arg(long)]
    to: NaiveDate,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Runs one command against the store and hands the result to the view.
async fn handle_command(command: Commands, store: &mut CatalogStore, view: &View) -> Result<(), DbError> {
    match command {
        Commands::Init => view.show_outcome(&store.bootstrap_schema().await?),
        Commands::List { table } => view.show_rows(&store.list(table).await?),
        Commands::Count { table } => view.show_count(table, store.count(table).await?),
        Commands::Add(add) => view.show_outcome(&store.insert(add.into_record()).await?),
        Commands::Update { table, assignments, condition } => {
            let patch = Patch::parse(table, &assignments)?;
            let condition = condition.map(|raw| Condition::parse(table, &raw)).transpose()?;
            view.show_outcome(&store.update(patch, condition).await?);
        }
        Commands::Delete { table, conditions } => {
            let mut conditions = conditions
                .iter()
                .map(|raw| Condition::parse(table, raw))
                .collect::<Result<Vec<_>, _>>()?;
            let outcome = if conditions.len() == 1 {
                store.delete(conditions.remove(0)).await?
            } else {
                store.delete_composite(table, conditions).await?
            };
            view.show_outcome(&outcome);
        }
        Commands::Generate { table, count } => view.show_outcome(&store.generate(table, count).await?),
        Commands::Search(args) => {
            let criteria = SearchCriteria {
                surname_pattern: args.surname,
                min_pages: args.min_pages,
                max_pages: args.max_pages,
                start_date: args.from,
                end_date: args.to,
            };
            view.show_hits(&store.advanced_search(&criteria).await?);
        }
    }
    Ok(())
}

impl AddCommand {
    fn into_record(self) -> NewRecord {
        match self {
            AddCommand::Author { name, surname } => NewRecord::Author(NewAuthor { name, surname }),
            AddCommand::Collection { name, kind, view } => {
                NewRecord::Collection(NewCollection { name, kind, view })
            }
            AddCommand::Edition { name, branch, pages, languages } => NewRecord::Edition(NewEdition {
                name,
                branch,
                number_of_pages: pages,
                languages,
            }),
            AddCommand::AuthorEdition { author_id, edition_id } => {
                NewRecord::AuthorEdition(AuthorEdition { author_id, edition_id })
            }
            AddCommand::EditionCollection { edition_id, collection_id, date } => {
                NewRecord::EditionCollection(EditionCollection { edition_id, collection_id, date })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_update_without_where_parses_to_no_condition() {
        let cli = Cli::parse_from(["catalog", "update", "edition", "--set", "number_of_pages=10"]);
        let Commands::Update { table, assignments, condition } = cli.command else {
            panic!("expected update");
        };
        assert_eq!(table, Table::Edition);
        assert_eq!(assignments, vec!["number_of_pages=10"]);
        assert!(condition.is_none());
    }

    #[test]
    fn test_add_edition_collection_without_date() {
        let cli = Cli::parse_from([
            "catalog", "add", "edition-collection", "--edition-id", "4", "--collection-id", "9",
        ]);
        let Commands::Add(add) = cli.command else { panic!("expected add") };
        assert_eq!(
            add.into_record(),
            NewRecord::EditionCollection(EditionCollection { edition_id: 4, collection_id: 9, date: None })
        );
    }

    #[test]
    fn test_search_arguments() {
        let cli = Cli::parse_from([
            "catalog", "--format", "json", "search", "--surname", "mit", "--min-pages", "50",
            "--max-pages", "500", "--from", "1900-01-01", "--to", "2000-12-31",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        let Commands::Search(args) = cli.command else { panic!("expected search") };
        assert_eq!(args.to, NaiveDate::from_ymd_opt(2000, 12, 31).unwrap());
    }
}
