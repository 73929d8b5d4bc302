//! CLI module for rota - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for the schedule view,
//! reference data management, regeneration and the local proxy.

pub mod commands;

pub use commands::Cli;
