//! SQLite persistence layer for grievance intake.
//!
//! This crate provides async database operations for departments, complaints,
//! and persisted chat sessions using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{complaint, Database, NewComplaint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:grievance.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // File a complaint against a seeded department
//!     let new = NewComplaint {
//!         title: "Streetlight out".to_string(),
//!         description: "Streetlight out on 4th Cross for a week".to_string(),
//!         transcript: None,
//!         language: Some("en".to_string()),
//!         translated_text: None,
//!         category: Some("Street Lighting".to_string()),
//!         subcategory: None,
//!         department_code: "BESCOM".to_string(),
//!         source: "web".to_string(),
//!         metadata: serde_json::json!({}),
//!     };
//!     let created = complaint::create_complaint(db.pool(), &new).await?;
//!     println!("{}", created.reference_number);
//!
//!     Ok(())
//! }
//! ```

pub mod complaint;
pub mod department;
pub mod error;
pub mod models;
pub mod session;

pub use error::{DatabaseError, Result};
pub use models::{
    Complaint, ComplaintStats, ComplaintStatus, Department, NewComplaint, NewDepartment,
    SessionRecord,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough to handle concurrent chat turns.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/grievance.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
