//! Core library for challengeme.
//!
//! This crate provides the domain models, the SQLite-backed challenge store
//! and the challenge selector, independent of the command-line front end.
//!
//! # Usage
//!
//! ```no_run
//! use challengeme_core::db::Database;
//! use challengeme_core::selector;
//!
//! let db = Database::open_at("defaults", "challenges.db")?;
//! let challenges = db.list_challenges()?;
//! let languages = db.list_languages()?;
//!
//! if let Ok((challenge, language)) = selector::pick_random_challenge(&challenges, &languages) {
//!     db.accept_challenge(challenge.id, &language.name)?;
//! }
//! db.close()?;
//! # Ok::<(), challengeme_core::StoreError>(())
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod selector;

// Re-export commonly used types at crate root
pub use db::Database;
pub use error::{EntityKind, NoEligibleChallenge, StoreError};
