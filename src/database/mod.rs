/*!
 * Database module for persistent storage of generated results.
 *
 * This module provides SQLite-based persistence for:
 * - Generated scripts, prompt variations and contracts
 * - Content hashes for duplicate lookups
 * - Aggregate statistics for the `history stats` command
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{GenerationKind, GenerationRecord, GenerationStats};
pub use repository::Repository;
