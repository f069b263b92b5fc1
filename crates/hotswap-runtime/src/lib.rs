use async_trait::async_trait;
use bytes::Bytes;
use hotswap_common::Result;

// Re-export dependencies potentially needed by consumers (like the migrator)
pub use bollard;
pub use hotswap_common as common;

pub mod docker;
mod error;
pub mod snapshot;
pub mod test_utils;

pub use docker::{DockerRuntime, RuntimeConfig};
pub use snapshot::{ContainerSnapshot, NewContainerSpec};

/// The container lifecycle and filesystem calls a swap needs.
///
/// Every call runs to completion before returning and reports failures with
/// the [`hotswap_common::SwapError`] taxonomy.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Inspect a container by name or ID.
    async fn inspect(&self, container: &str) -> Result<ContainerSnapshot>;

    /// Read `path` out of a container as a tar archive.
    async fn copy_out(&self, container: &str, path: &str) -> Result<Bytes>;

    /// Create, but do not start, a container. Returns its ID.
    async fn create(&self, spec: &NewContainerSpec) -> Result<String>;

    /// Stop a container using the runtime's default grace period.
    async fn stop(&self, container: &str) -> Result<()>;

    async fn start(&self, container: &str) -> Result<()>;

    /// Extract a tar archive into `dir` inside a container.
    async fn copy_in(&self, container: &str, dir: &str, archive: Bytes) -> Result<()>;

    async fn rename(&self, container: &str, new_name: &str) -> Result<()>;

    async fn remove(&self, container: &str) -> Result<()>;
}
