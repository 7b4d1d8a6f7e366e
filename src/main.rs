/// Main entry point for the Daykeeper MCP server
///
/// This file sets up logging, parses command line arguments, and starts the
/// MCP server. The server listens for JSON-RPC requests over stdin/stdout
/// following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use daykeeper_mcp::{domain, DaykeeperServer};

/// Default database location: `~/.daykeeper/habits.db`, falling back to a
/// temp directory when no usable home exists (e.g. bare containers).
fn get_default_database_path() -> Result<PathBuf, std::io::Error> {
    if let Some(home) = dirs::home_dir() {
        let dir = home.join(".daykeeper");
        if std::fs::create_dir_all(&dir).is_ok() {
            return Ok(dir.join("habits.db"));
        }
    }

    let dir = std::env::temp_dir().join("daykeeper");
    std::fs::create_dir_all(&dir)?;
    tracing::warn!("Using temporary directory for database: {}", dir.display());
    Ok(dir.join("habits.db"))
}

/// Command line arguments for the Daykeeper MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// IANA timezone used to decide what "today" means (e.g. Europe/Berlin)
    #[arg(long, default_value = "UTC")]
    timezone: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("daykeeper_mcp={}", log_level))
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    info!("Starting Daykeeper MCP server");

    let timezone = domain::parse_timezone(&args.timezone)?;

    // Determine database path
    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let server = DaykeeperServer::new(db_path, timezone)?;

    // Run the MCP server over stdin/stdout
    server.run().await?;

    info!("Daykeeper MCP server shutdown complete");
    Ok(())
}
