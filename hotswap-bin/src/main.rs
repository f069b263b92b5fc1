use clap::Parser;
use color_eyre::eyre;
use hotswap_lib::Migrator;
use hotswap_runtime::DockerRuntime;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::Cli;

/// `--verbose` output is logged by the migrator at `info`; keep it visible
/// whatever `RUST_LOG` says.
fn log_filter(filter: EnvFilter, verbose: bool) -> eyre::Result<EnvFilter> {
    if verbose {
        Ok(filter.add_directive("hotswap_lib=info".parse()?))
    } else {
        Ok(filter)
    }
}

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(filter, cli.verbose)?)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    let runtime = match DockerRuntime::connect(&cli.runtime_config()) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let migrator = Migrator::new(runtime, cli.migrator_config());
    match migrator.run(&cli.container, &cli.plan()).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Swap complete");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
