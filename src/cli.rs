//! CLI argument parsing with clap.

use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "good-bots")]
#[command(
    author,
    version,
    about = "Fetch bot IP addresses and generate django-turnstile-site-protect configuration"
)]
pub struct Cli {
    /// Directory to save the bot_ips_config.py file (default: current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// YAML file overriding source endpoints and output naming
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Quiet mode (for cron)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Output directory, defaulting to the working directory.
    pub fn output_dir(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths that are not valid UTF-8 are returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    }
}
