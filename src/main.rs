// ABOUTME: CLI entrypoint for wiz-export command
// ABOUTME: Handles error exit codes, usage output, and logging setup

use clap::{CommandFactory, Parser};
use std::time::Duration;
use wiz_export::{
    api::ApiClient, auth::resolve_credentials, cli::Cli, config::ExportConfig,
    export::run_export, Error, Result,
};

const LOG_ENV: &str = "WIZ_EXPORT_LOG";

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("wiz-export: {}", e);
    }

    if let Err(e) = run(&cli) {
        if matches!(e, Error::Usage(_)) {
            let _ = Cli::command().print_help();
            println!();
        }
        eprintln!("wiz-export: [E{}] {}", e.exit_code(), e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<()> {
    let credentials = resolve_credentials(cli.user_id.clone(), cli.password.clone())?;
    let config = ExportConfig::from_cli(cli)?;

    let client = ApiClient::new(
        Some(cli.account_server.clone()),
        Some(Duration::from_secs(cli.timeout_secs)),
    )?;

    let show_progress = !cli.quiet && !cli.verbose;
    let report = run_export(&client, &credentials, &config, show_progress)?;
    println!("{}", report);

    let failures = report.failure_count();
    if config.strict && failures > 0 {
        return Err(Error::Incomplete(failures));
    }

    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
