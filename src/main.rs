use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schedule_editor::api::router;
use schedule_editor::config::{Config, DEFAULT_LOG_FILTER};
use schedule_editor::db;
use schedule_editor::import::{self, ImportOptions};
use schedule_editor::state::AppState;

#[derive(Parser)]
#[command(name = "schedule-editor", about = "Course schedule editor: subject catalog, schedules and bulk import")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API
    Serve,
    /// Import subjects from a backtick-delimited text file
    Import {
        /// Path to the data file
        #[arg(long, default_value = import::DEFAULT_FILE)]
        file: PathBuf,
        /// Delete existing subjects before importing
        #[arg(long)]
        clear: bool,
    },
    /// Delete all subjects, schedules and schedule items
    Clear {
        /// Required, otherwise nothing is deleted
        #[arg(long)]
        confirm: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let pool = db::connect(&config.database_url).await?;
    db::migrate(&pool).await?;

    match cli.command {
        Commands::Serve => {
            let addr = config.socket_addr()?;
            let app = router(AppState { db: pool.clone() });

            info!("listening on http://{}", addr);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
        Commands::Import { file, clear } => {
            let options = ImportOptions {
                clear,
                ..ImportOptions::default()
            };
            match import::import_file(&pool, &file, &options).await {
                Ok(stats) => {
                    println!("Import completed!");
                    println!("Created: {} subjects", stats.created);
                    println!("Skipped: {} subjects", stats.skipped);
                    println!("Errors: {} subjects", stats.errors);
                }
                Err(e) => {
                    error!("import aborted: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Clear { confirm } => {
            if !confirm {
                warn!("This will delete ALL subjects and related data from the database.");
                warn!("To confirm, run: schedule-editor clear --confirm");
                return Ok(());
            }

            info!("Deleting all subjects and related data...");
            let stats = import::clear_all(&pool).await?;
            println!("Successfully deleted:");
            println!("- {} subjects", stats.subjects);
            println!("- {} schedules", stats.schedules);
            println!("- {} schedule items", stats.schedule_items);
        }
    }

    Ok(())
}
