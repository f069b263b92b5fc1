use clap::Parser;
use hotswap_common::MigrationPlan;
use hotswap_lib::MigratorConfig;
use hotswap_runtime::docker::DEFAULT_TIMEOUT_SECS;
use hotswap_runtime::RuntimeConfig;
use std::time::Duration;

/// Replace a running container with a fresh one built from its own configuration.
#[derive(Debug, Parser)]
#[command(name = "hotswap", version, about)]
pub struct Cli {
    /// Name or ID of the container to replace
    #[arg(value_name = "CONTAINER_ID")]
    pub container: String,

    /// File or directory to copy into the new container (repeatable)
    #[arg(short = 'f', long = "copy-files", value_name = "PATH", value_parser = absolute_path)]
    pub copy_files: Vec<String>,

    /// Image name for the new container
    #[arg(short, long)]
    pub image: Option<String>,

    /// Remove the old container after the swap
    #[arg(long = "rm")]
    pub remove_old_container: bool,

    /// Show verbose debug information
    #[arg(short, long)]
    pub verbose: bool,

    /// Timeout in seconds for each Docker API call
    #[arg(
        long,
        value_name = "SECS",
        env = "HOTSWAP_DOCKER_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub docker_timeout: u64,
}

impl Cli {
    pub fn plan(&self) -> MigrationPlan {
        MigrationPlan::new(
            self.copy_files.clone(),
            self.image.clone(),
            self.remove_old_container,
        )
    }

    pub fn migrator_config(&self) -> MigratorConfig {
        MigratorConfig {
            verbose: self.verbose,
        }
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            timeout: Duration::from_secs(self.docker_timeout),
        }
    }
}

fn absolute_path(value: &str) -> Result<String, String> {
    if value.starts_with('/') {
        Ok(value.to_string())
    } else {
        Err(format!("{value} is not an absolute path"))
    }
}
