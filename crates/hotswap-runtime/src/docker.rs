use crate::bollard::container::{
    CreateContainerOptions, DownloadFromContainerOptions, InspectContainerOptions,
    RenameContainerOptions, StartContainerOptions, UploadToContainerOptions,
};
use crate::bollard::errors::Error as BollardError;
use crate::bollard::Docker;
use crate::error::{classify, is_not_modified, Call};
use crate::{ContainerRuntime, ContainerSnapshot, NewContainerSpec};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use hotswap_common::{Result, SwapError};
use std::time::Duration;
use tracing::{debug, instrument};

/// Per-call timeout bollard applies when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Applied by the client to every daemon request.
    pub timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// [`ContainerRuntime`] backed by the Docker Engine API.
#[derive(Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// Connect using the Docker environment (`DOCKER_HOST`, `DOCKER_TLS_VERIFY`,
    /// `DOCKER_CERT_PATH`), falling back to the platform's default socket.
    ///
    /// A missing local socket fails here. A TCP daemon is only reached on the
    /// first call.
    pub fn connect(config: &RuntimeConfig) -> Result<Self> {
        let docker = Docker::connect_with_defaults()
            .map_err(|e| SwapError::RuntimeUnavailable(e.to_string()))?
            .with_timeout(config.timeout);
        Ok(Self::new(docker))
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    #[instrument(skip(self))]
    async fn inspect(&self, container: &str) -> Result<ContainerSnapshot> {
        let inspected = self
            .docker
            .inspect_container(container, None::<InspectContainerOptions>)
            .await
            .map_err(|e| classify(Call::Inspect { container }, e))?;
        ContainerSnapshot::try_from(inspected)
    }

    #[instrument(skip(self))]
    async fn copy_out(&self, container: &str, path: &str) -> Result<Bytes> {
        let options = DownloadFromContainerOptions { path };
        let archive = self
            .docker
            .download_from_container(container, Some(options))
            .try_fold(BytesMut::new(), |mut archive, chunk| async move {
                archive.extend_from_slice(&chunk);
                Ok::<_, BollardError>(archive)
            })
            .await
            .map_err(|e| classify(Call::CopyOut { container, path }, e))?;
        debug!(bytes = archive.len(), "Archive read");
        Ok(archive.freeze())
    }

    #[instrument(skip(self, spec), fields(name = %spec.name, image = %spec.image()))]
    async fn create(&self, spec: &NewContainerSpec) -> Result<String> {
        let options = CreateContainerOptions {
            name: spec.name.as_str(),
            platform: None,
        };
        let created = self
            .docker
            .create_container(Some(options), spec.create_config())
            .await
            .map_err(|e| {
                classify(
                    Call::Create {
                        name: &spec.name,
                        image: spec.image(),
                    },
                    e,
                )
            })?;
        for warning in &created.warnings {
            debug!(%warning, "Daemon warning on create");
        }
        Ok(created.id)
    }

    #[instrument(skip(self))]
    async fn stop(&self, container: &str) -> Result<()> {
        match self.docker.stop_container(container, None).await {
            Ok(()) => Ok(()),
            Err(e) if is_not_modified(&e) => {
                debug!("Container was already stopped");
                Ok(())
            }
            Err(e) => Err(classify(Call::Stop { container }, e)),
        }
    }

    #[instrument(skip(self))]
    async fn start(&self, container: &str) -> Result<()> {
        self.docker
            .start_container(container, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| classify(Call::Start { container }, e))
    }

    #[instrument(skip(self, archive), fields(bytes = archive.len()))]
    async fn copy_in(&self, container: &str, dir: &str, archive: Bytes) -> Result<()> {
        let options = UploadToContainerOptions {
            path: dir,
            ..Default::default()
        };
        self.docker
            .upload_to_container(container, Some(options), archive)
            .await
            .map_err(|e| classify(Call::CopyIn { container, dir }, e))
    }

    #[instrument(skip(self))]
    async fn rename(&self, container: &str, new_name: &str) -> Result<()> {
        let options = RenameContainerOptions { name: new_name };
        self.docker
            .rename_container(container, options)
            .await
            .map_err(|e| {
                classify(
                    Call::Rename {
                        container,
                        name: new_name,
                    },
                    e,
                )
            })
    }

    #[instrument(skip(self))]
    async fn remove(&self, container: &str) -> Result<()> {
        self.docker
            .remove_container(container, None)
            .await
            .map_err(|e| classify(Call::Remove { container }, e))
    }
}
