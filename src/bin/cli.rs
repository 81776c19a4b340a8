//! Integral Archive CLI
//!
//! Local consumer of the sync engine: one-shot queries against a fresh
//! snapshot, or a long-running watch loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use integral_archive::{
    config::Config,
    error::{AppError, Result},
    feed::HttpFetcher,
    models::{Difficulty, ProblemRecord},
    query::{self, SortOrder},
    sync::{ArchiveSnapshot, SyncEngine, SyncService},
};

/// Integral Archive - spreadsheet-backed problem catalog
#[derive(Parser, Debug)]
#[command(
    name = "integral-archive",
    version,
    about = "Syncs and queries the Jom integral archive"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one sync cycle and print a summary
    Fetch {
        /// Dump the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show today's pick: latest date, highest id on ties
    Today,

    /// Show the curated top-10 subset
    Top10,

    /// Search the archive
    Search {
        /// Text matched against title, tags, and id
        #[arg(default_value = "")]
        query: String,

        /// Difficulty filter: all, easy, medium, hard
        #[arg(short, long, default_value = "all")]
        difficulty: String,

        /// Sort order: newest, oldest, difficulty
        #[arg(short, long, default_value = "newest")]
        sort: String,
    },

    /// Show one record by id
    Show { id: String },

    /// Keep the archive synced until interrupted
    Watch,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Run one sync cycle and return the resulting snapshot.
async fn sync_once(config: &Config) -> Result<ArchiveSnapshot> {
    let fetcher = Arc::new(HttpFetcher::new(config)?);
    let engine = SyncEngine::new(config.sync.clone(), fetcher);
    engine.sync().await;
    Ok(engine.snapshot().await)
}

fn parse_difficulty(raw: &str) -> Result<Option<Difficulty>> {
    match raw.to_lowercase().as_str() {
        "all" => Ok(None),
        "easy" => Ok(Some(Difficulty::Easy)),
        "medium" => Ok(Some(Difficulty::Medium)),
        "hard" => Ok(Some(Difficulty::Hard)),
        other => Err(AppError::config(format!(
            "Unknown difficulty filter '{other}' (use all, easy, medium, hard)"
        ))),
    }
}

fn parse_sort(raw: &str) -> Result<SortOrder> {
    match raw.to_lowercase().as_str() {
        "newest" => Ok(SortOrder::Newest),
        "oldest" => Ok(SortOrder::Oldest),
        "difficulty" => Ok(SortOrder::Difficulty),
        other => Err(AppError::config(format!(
            "Unknown sort order '{other}' (use newest, oldest, difficulty)"
        ))),
    }
}

fn print_record_line(record: &ProblemRecord) {
    println!(
        "#{:<4} [{:<6}] {:<10} {}",
        record.id, record.difficulty, record.date, record.title
    );
}

fn print_record_full(record: &ProblemRecord) {
    println!("#{} {}", record.id, record.title);
    println!("  Difficulty: {}", record.difficulty);
    println!("  Date:       {}", record.date);
    println!("  Tags:       {}", record.tags.join(", "));
    println!("  Formula:    {}", record.formula);
    println!("  Hint:       {}", record.hint);
    if !record.answer.is_empty() {
        println!("  Answer:     {}", record.answer);
    }
    if !record.solution_link.is_empty() {
        println!("  Solution:   {}", record.solution_link);
    }
    if !record.reflection.is_empty() {
        println!("  Thoughts:   {}", record.reflection);
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Fetch { json } => {
            let snapshot = sync_once(&config).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                println!("Records:  {}", snapshot.records.len());
                println!("Featured: {}", query::featured(&snapshot.records).len());
                println!("Quote:    {}", snapshot.metadata.quote);
                if let Some(error) = &snapshot.last_error {
                    println!("Error:    {error}");
                }
            }
        }

        Command::Today => {
            let snapshot = sync_once(&config).await?;
            match query::daily_pick(&snapshot.records) {
                Some(record) => {
                    println!("Today's Integral");
                    print_record_full(record);
                }
                None => println!("Archive is currently empty."),
            }
        }

        Command::Top10 => {
            let snapshot = sync_once(&config).await?;
            let featured = query::featured(&snapshot.records);
            if featured.is_empty() {
                println!("No integrals currently marked for Top 10.");
            }
            for record in &featured {
                print_record_line(record);
            }
        }

        Command::Search {
            query: text,
            difficulty,
            sort,
        } => {
            let difficulty = parse_difficulty(&difficulty)?;
            let order = parse_sort(&sort)?;

            let snapshot = sync_once(&config).await?;
            let results = query::search_archive(&snapshot.records, &text, difficulty, order);
            log::info!("{} of {} records match", results.len(), snapshot.records.len());
            for record in &results {
                print_record_line(record);
            }
        }

        Command::Show { id } => {
            let snapshot = sync_once(&config).await?;
            match query::by_id(&snapshot.records, &id) {
                Some(record) => print_record_full(record),
                None => {
                    log::error!("No record with id {id}");
                    return Err(AppError::config(format!("No record with id {id}")));
                }
            }
        }

        Command::Watch => {
            let fetcher = Arc::new(HttpFetcher::new(&config)?);
            let engine = SyncEngine::new(config.sync.clone(), fetcher);
            let interval = Duration::from_secs(config.sync.refresh_interval_secs);
            let service = SyncService::start(Arc::clone(&engine), interval);

            log::info!(
                "Watching archive, refreshing every {}s. Ctrl-C to stop.",
                config.sync.refresh_interval_secs
            );
            tokio::signal::ctrl_c().await?;

            service.shutdown().await;
            let snapshot = engine.snapshot().await;
            log::info!("Stopped with {} records held.", snapshot.records.len());
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {e}");
                return Err(e);
            }
            log::info!("Config OK (feeds, http, sync)");
        }
    }

    Ok(())
}
