/// Public library interface for the Daykeeper MCP server
///
/// This module exports the main server implementation and the public types
/// that other applications or tests can use.

use std::path::PathBuf;
use chrono_tz::Tz;
use thiserror::Error;

pub mod domain;
pub mod storage;
pub mod tools;

mod mcp;

// Re-export the types most callers need
pub use domain::{DomainError, Habit, HabitId};
pub use storage::{HabitStorage, SqliteStorage, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main habit tracker server that implements the MCP protocol
///
/// The server manages habit data through a SQLite database and computes
/// streaks against the calendar of a single configured timezone. All
/// "today" decisions flow from that timezone; nothing else consults the
/// system clock.
pub struct DaykeeperServer {
    storage: SqliteStorage,
    timezone: Tz,
}

impl DaykeeperServer {
    /// Create a new server with the specified database path and timezone
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub fn new(db_path: PathBuf, timezone: Tz) -> Result<Self, ServerError> {
        tracing::info!(
            "Initializing Daykeeper server with database {:?}, timezone {}",
            db_path,
            timezone
        );

        let storage = SqliteStorage::new(db_path)?;

        Ok(Self { storage, timezone })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin closes or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        let count = self.storage.count_habits()?;
        tracing::info!("Server started, tracking {} existing habits", count);

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// The current calendar day in the configured timezone
    pub fn today(&self) -> chrono::NaiveDate {
        domain::today_in_tz(self.timezone)
    }
}
