//! Command-line front end for challengeme.
//!
//! The store, models and selector live in `challengeme-core`; this crate
//! turns subcommands into calls against them and renders the results.

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
