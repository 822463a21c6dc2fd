#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! repo-analyst - narrative reports for GitHub repositories
//!
//! Fetches repository metadata and the README from the GitHub REST API, turns
//! them into a narrative report (rule-based, or model-backed when an API key
//! is configured) and exports reports as PDF or Markdown.
//!
//! ## Usage
//! ```rust,ignore
//! use repo_analyst::{Config, RepoAnalyzer};
//!
//! async fn example() -> repo_analyst::Result<()> {
//!     let config = Config::load()?;
//!     let analyzer = RepoAnalyzer::new(&config)?;
//!     let bundle = analyzer.analyze("https://github.com/rust-lang/rust").await?;
//!     println!("{}", bundle.narrative);
//!     Ok(())
//! }
//! ```

/// Request orchestration
pub mod analyzer;
/// HTTP surface for the web service
pub mod api;
/// Console helpers for the interactive front end
pub mod cli;
/// Configuration module for the application
pub mod config;
/// Error handling types and utilities
pub mod error;
/// PDF and Markdown export
pub mod export;
/// GitHub REST client
pub mod github;
/// Logging configuration and utilities
pub mod logging;
/// Repository metadata and report bundles
pub mod models;
/// Narrative strategies
pub mod narrative;
/// Prompt templates for the external model
pub mod prompts;

// Re-export common types
pub use analyzer::RepoAnalyzer;
pub use config::Config;
pub use error::{AnalystError, Result};
pub use export::ExportFormat;
pub use models::{ReportBundle, RepositoryMetadata};
pub use narrative::NarrativeStrategy;
