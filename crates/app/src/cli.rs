//! Command line interface.

use clap::Parser;
use url::Url;

/// Console client for a remote current-datetime service.
#[derive(Debug, Parser)]
#[command(name = "timeview", version, about)]
pub struct Cli {
    /// Base URL of the time service.
    #[arg(
        long,
        env = "TIMEVIEW_BASE_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    pub base_url: Url,

    /// Per-request timeout in seconds. Waits forever when omitted.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Fetch once, print the outcome, and exit.
    #[arg(long)]
    pub once: bool,
}
