//! Sample Function runner
//!
//! Reads one gateway event per line from stdin and writes one response per
//! line to stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! echo '{"body":"{\"test\":\"hello\",\"date\":\"2019/07/01\"}"}' \
//!     | cargo run --package sample-function -- --profile development
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use gatebind::runtime::GatewayRuntime;
use sample_function::SampleFunction;
use tokio::io::BufReader;
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about = "Runs the sample function over JSON-line events")]
struct Args {
    /// Configuration file to load instead of searching for gatebind.toml.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile (e.g. development, production).
    #[arg(short, long)]
    profile: Option<String>,

    /// Function name reported to the action.
    #[arg(long, default_value = "sample-function")]
    function_name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = GatewayRuntime::builder(SampleFunction::default());
    if let Some(path) = &args.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &args.profile {
        builder = builder.profile(profile);
    }
    let runtime = builder.build()?.function_name(args.function_name);

    let handled = runtime
        .run_lines(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    info!(handled, "Sample function finished");
    Ok(())
}
