//! # Good-Bots - crawler IP ranges for django-turnstile-site-protect
//!
//! Fetches the IP ranges that search engines and AI crawlers publish,
//! merges them with user-supplied bots and writes a Python module listing
//! every range as `start_ip-end_ip`, ready to be appended to
//! `TURNSTILE_EXCLUDED_IPS`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (clap)                                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Aggregator                                                 │
//! │    ├── Fetcher (reqwest) + response-shape decoders          │
//! │    │     Google, Bing, OpenAI, Apple, Perplexity, Naver,    │
//! │    │     Mistral, DuckDuckGo, Common Crawl                  │
//! │    ├── Additional bots (additional_bots.json or default)    │
//! │    └── Range normalizer (ipnet)                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config writer (atomic write of bot_ips_config.py)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use good_bots::commands::generate::generate;
//! use good_bots::config::GeneratorConfig;
//! use good_bots::fetcher::Fetcher;
//! use good_bots::fs_abstraction::real_fs;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GeneratorConfig::default();
//!     let fetcher = Fetcher::new()?;
//!     let generated = generate(&config, real_fs(), &fetcher, Path::new(".")).await?;
//!     println!("{} ranges", generated.output.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Failure policy
//!
//! A provider that is down or changed its format contributes nothing and the
//! run carries on. A malformed `additional_bots.json`, an output path with
//! `..` segments, or a failed write abort the run without touching the
//! previous output file.

pub mod aggregator;
pub mod bots;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod fs_abstraction;
pub mod range;
pub mod sources;
pub mod utils;
pub mod writer;

pub use cli::Cli;
pub use config::GeneratorConfig;
pub use error::GoodBotsError;
