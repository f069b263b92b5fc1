use hotswap_common::new_container_name;
use hotswap_runtime::bollard::container::NetworkingConfig;
use hotswap_runtime::{ContainerSnapshot, NewContainerSpec};

/// Build the replacement's spec from an inspected container.
///
/// Runtime and host configuration are carried over unchanged except for the
/// image, which is `image_override` when given. The replacement joins the same
/// networks with the same endpoint settings and is named
/// `<name>_newContainer`, so it cannot collide with the still-existing source.
pub fn replacement_spec(snapshot: &ContainerSnapshot, image_override: Option<&str>) -> NewContainerSpec {
    let mut config = snapshot.config.clone();
    if let Some(image) = image_override {
        config.image = Some(image.to_string());
    }

    NewContainerSpec {
        name: new_container_name(&snapshot.name),
        config,
        host_config: snapshot.host_config.clone(),
        networking: NetworkingConfig {
            endpoints_config: snapshot.networks.clone(),
        },
    }
}
