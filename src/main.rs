use anyhow::Context;
use clap::Parser;
use portsweep::cli::Cli;
use portsweep::config::AppSettings;
use portsweep::output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => AppSettings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => AppSettings::load().context("loading settings")?,
    };

    cli.scan.execute(&settings, cli.quiet).await?;
    Ok(())
}

/// Log to stderr so stdout carries only the report.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "portsweep=debug" } else { "portsweep=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
