//! Inspected container state and the spec a replacement is created from

use crate::bollard::container::{Config, NetworkingConfig};
use crate::bollard::models::{
    ContainerConfig, ContainerInspectResponse, EndpointSettings, HostConfig,
};
use hotswap_common::{Result, SwapError};
use serde::Serialize;
use std::collections::HashMap;

/// A container's configuration as seen at inspection time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerSnapshot {
    pub id: String,
    /// Container name without the daemon's leading `/`.
    pub name: String,
    pub config: ContainerConfig,
    pub host_config: HostConfig,
    /// Attached networks, keyed by network name.
    pub networks: HashMap<String, EndpointSettings>,
}

impl ContainerSnapshot {
    pub fn image(&self) -> Option<&str> {
        self.config.image.as_deref()
    }
}

impl TryFrom<ContainerInspectResponse> for ContainerSnapshot {
    type Error = SwapError;

    fn try_from(inspected: ContainerInspectResponse) -> Result<Self> {
        let id = inspected.id.ok_or_else(|| SwapError::Operation {
            operation: "inspect",
            message: "daemon returned a container without an ID".to_string(),
        })?;
        let name = inspected
            .name
            .as_deref()
            .map(|n| n.trim_start_matches('/'))
            .filter(|n| !n.is_empty())
            .ok_or_else(|| SwapError::Operation {
                operation: "inspect",
                message: format!("container {id} has no name"),
            })?
            .to_string();

        Ok(Self {
            id,
            name,
            config: inspected.config.unwrap_or_default(),
            host_config: inspected.host_config.unwrap_or_default(),
            networks: inspected
                .network_settings
                .and_then(|settings| settings.networks)
                .unwrap_or_default(),
        })
    }
}

/// Everything needed to create the replacement container.
#[derive(Debug, Clone, Serialize)]
pub struct NewContainerSpec {
    pub name: String,
    pub config: ContainerConfig,
    pub host_config: HostConfig,
    pub networking: NetworkingConfig<String>,
}

impl NewContainerSpec {
    /// The create-request body: runtime config with host and network config attached.
    pub fn create_config(&self) -> Config<String> {
        Config {
            host_config: Some(self.host_config.clone()),
            networking_config: Some(self.networking.clone()),
            ..Config::from(self.config.clone())
        }
    }

    pub fn image(&self) -> &str {
        self.config.image.as_deref().unwrap_or_default()
    }
}
