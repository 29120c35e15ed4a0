use std::path::PathBuf;

use clap::Parser;

mod parsers;


use self::parsers::parse_min_one_u64;

#[derive(Debug, Parser)]
#[command(name = "rulelint")]
#[command(
    about = "Report Prometheus rules that reference metrics with no series",
    version
)]
pub struct Cli {
    /// Prometheus base URL. Falls back to `RULELINT_URL`.
    #[arg(long)]
    pub url: Option<String>,
    /// Validate rules from these rule files instead of the rules loaded by the server.
    #[arg(long = "rules-file", value_name = "PATH")]
    pub rules_files: Vec<PathBuf>,
    /// Bearer token sent with every request. Falls back to `RULELINT_BEARER_TOKEN`.
    #[arg(long)]
    pub bearer_token: Option<String>,
    /// Per-request timeout. Falls back to `RULELINT_TIMEOUT_MS`, then 10000.
    #[arg(long, value_parser = parse_min_one_u64)]
    pub timeout_ms: Option<u64>,
    /// Print the run report as JSON on stdout.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
