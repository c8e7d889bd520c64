//! Common library for the overtime tracker
//!
//! This crate provides shared functionality used by the services of the
//! workspace: database connectivity, migrations and error handling.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, close_pool, health_check, init_pool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     let is_healthy = health_check(&pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     close_pool(&pool).await;
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
