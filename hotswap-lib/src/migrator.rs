use crate::merge::replacement_spec;
use crate::staging::StagedFile;
use hotswap_common::{
    new_container_name, old_container_name, MigrationPlan, Result, SwapError,
};
use hotswap_runtime::{ContainerRuntime, ContainerSnapshot};
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default)]
pub struct MigratorConfig {
    /// Trace each step and dump the inspected and derived configuration.
    pub verbose: bool,
}

/// Where things stand once a swap has gone through every configured step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    /// Name the replacement now answers to.
    pub name: String,
    pub replacement_id: String,
    pub original_id: String,
    /// `<name>_oldContainer`, unless it was removed.
    pub original: Option<String>,
}

pub struct Migrator<R> {
    runtime: R,
    config: MigratorConfig,
}

impl<R: ContainerRuntime> Migrator<R> {
    pub fn new(runtime: R, config: MigratorConfig) -> Self {
        Self { runtime, config }
    }

    /// Swap `container` (name or ID) for a replacement built from its own
    /// configuration.
    ///
    /// The first failing step ends the run with its error. Earlier steps are
    /// not undone: a created replacement stays created, a stopped source stays
    /// stopped.
    #[instrument(skip(self, plan), fields(files = plan.copy_files.len()))]
    pub async fn run(&self, container: &str, plan: &MigrationPlan) -> Result<SwapOutcome> {
        let snapshot = self.inspect(container).await?;
        // Read while the source is still running.
        let staged = self.extract_files(&snapshot.id, &plan.copy_files).await?;
        let replacement_id = self
            .create_replacement(&snapshot, plan.image.as_deref())
            .await?;
        self.stop_source(&snapshot.id).await?;
        self.start_replacement(&replacement_id).await?;
        self.inject_files(&replacement_id, staged).await?;
        self.rename(&snapshot.name).await?;

        let original = if plan.remove_original {
            self.remove_original(&snapshot.name).await?;
            None
        } else {
            Some(old_container_name(&snapshot.name))
        };

        Ok(SwapOutcome {
            name: snapshot.name,
            replacement_id,
            original_id: snapshot.id,
            original,
        })
    }

    pub async fn inspect(&self, container: &str) -> Result<ContainerSnapshot> {
        self.trace(format_args!("inspect {container}"));
        let snapshot = self.runtime.inspect(container).await?;
        self.dump("inspected", &snapshot)?;
        Ok(snapshot)
    }

    /// Read every path out of the source, in order.
    pub async fn extract_files(&self, container: &str, paths: &[String]) -> Result<Vec<StagedFile>> {
        let mut staged = Vec::with_capacity(paths.len());
        for path in paths {
            self.trace(format_args!("copy file from {path}"));
            let archive = self.runtime.copy_out(container, path).await?;
            staged.push(StagedFile::new(path.as_str(), archive));
        }
        Ok(staged)
    }

    /// Create `<name>_newContainer` from the snapshot. Returns its ID.
    pub async fn create_replacement(
        &self,
        snapshot: &ContainerSnapshot,
        image_override: Option<&str>,
    ) -> Result<String> {
        self.trace(format_args!("create new container"));
        let spec = replacement_spec(snapshot, image_override);
        self.dump("ContainerConfig", &spec.config)?;
        self.dump("HostConfig", &spec.host_config)?;
        self.dump("NetworkingConfig", &spec.networking)?;
        self.runtime.create(&spec).await
    }

    pub async fn stop_source(&self, container: &str) -> Result<()> {
        self.trace(format_args!("stop old container"));
        self.runtime.stop(container).await
    }

    pub async fn start_replacement(&self, container: &str) -> Result<()> {
        self.trace(format_args!("start new container"));
        self.runtime.start(container).await
    }

    /// Write each staged archive into the directory its source path lives in.
    pub async fn inject_files(&self, container: &str, staged: Vec<StagedFile>) -> Result<()> {
        for file in staged {
            let dir = file.target_dir().to_string();
            self.trace(format_args!("copy file to {dir}"));
            self.runtime
                .copy_in(container, &dir, file.into_archive())
                .await?;
        }
        Ok(())
    }

    /// Move the source to `<name>_oldContainer`, then the replacement to `<name>`.
    ///
    /// Not atomic: if the second rename fails, both containers keep their
    /// temporary names.
    pub async fn rename(&self, name: &str) -> Result<()> {
        self.trace(format_args!("rename containers"));
        self.runtime.rename(name, &old_container_name(name)).await?;
        self.runtime.rename(&new_container_name(name), name).await
    }

    pub async fn remove_original(&self, name: &str) -> Result<()> {
        self.trace(format_args!("remove old container"));
        self.runtime.remove(&old_container_name(name)).await
    }

    fn trace(&self, step: std::fmt::Arguments<'_>) {
        if self.config.verbose {
            info!("{step}");
        }
    }

    fn dump<T: Serialize>(&self, label: &str, value: &T) -> Result<()> {
        if self.config.verbose {
            let pretty = serde_json::to_string_pretty(value)
                .map_err(|e| SwapError::Serialization(e.to_string()))?;
            info!("{label}: {pretty}");
        }
        Ok(())
    }
}
