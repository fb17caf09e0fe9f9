use std::path::PathBuf;

use clap::Parser;

/// Roster: submit a faculty page to the scraping service and export what it finds.
///
/// Type a URL and press Enter to scrape it. `:export [csv|json]` saves the
/// current results, `:help` lists commands and `:quit` exits.
#[derive(Parser, Debug, Default)]
#[command(name = "roster")]
#[command(version)]
#[command(about = "Scrape faculty pages through a roster service", long_about = None)]
pub struct Cli {
    /// URL to scrape right after startup
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Path to a RON configuration file (default: ./roster.ron if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the scraping service
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Directory exported files are saved to
    #[arg(long, value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
