//! In-memory container runtime that records every call it receives.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use hotswap_lib::{Result, SwapError};
use hotswap_runtime::bollard::models::{ContainerConfig, EndpointSettings, HostConfig};
use hotswap_runtime::{ContainerRuntime, ContainerSnapshot, NewContainerSpec};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Inspect(String),
    CopyOut { container: String, path: String },
    Create { name: String, image: String },
    Stop(String),
    Start(String),
    CopyIn { container: String, dir: String },
    Rename { from: String, to: String },
    Remove(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Inspect,
    CopyOut,
    Create,
    Stop,
    Start,
    CopyIn,
    Rename,
    Remove,
}

#[derive(Debug, Clone)]
pub struct MockContainer {
    pub id: String,
    pub name: String,
    pub running: bool,
    pub config: ContainerConfig,
    pub host_config: HostConfig,
    pub networks: HashMap<String, EndpointSettings>,
    /// Archives served by copy-out, keyed by path.
    pub files: HashMap<String, Bytes>,
    /// Archives received by copy-in, in arrival order.
    pub uploads: Vec<(String, Bytes)>,
}

impl MockContainer {
    pub fn image(&self) -> Option<&str> {
        self.config.image.as_deref()
    }
}

type FailureFn = fn(&str) -> SwapError;

struct Failure {
    op: Op,
    subject: Option<String>,
    error: FailureFn,
}

#[derive(Default)]
struct State {
    containers: Vec<MockContainer>,
    images: HashSet<String>,
    calls: Vec<Call>,
    failures: Vec<Failure>,
    next_id: usize,
}

impl State {
    fn position(&self, key: &str) -> Option<usize> {
        self.containers
            .iter()
            .position(|c| c.id == key || c.name == key)
    }

    fn not_found(container: &str) -> SwapError {
        SwapError::NotFound {
            container: container.to_string(),
            message: format!("No such container: {container}"),
        }
    }

    fn injected(&mut self, op: Op, subject: &str) -> Option<SwapError> {
        let idx = self.failures.iter().position(|f| {
            f.op == op && f.subject.as_deref().map_or(true, |s| s == subject)
        })?;
        Some((self.failures.remove(idx).error)(subject))
    }
}

/// Shared handle; clones observe the same containers and call log.
#[derive(Clone, Default)]
pub struct MockRuntime {
    state: Arc<Mutex<State>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runtime holding one running container `web` on `web:v1` with
    /// `/etc/app.conf`, plus the `web:v1` and `web:v2` images.
    pub fn with_web() -> Self {
        let runtime = Self::new();
        runtime.add_image("web:v1");
        runtime.add_image("web:v2");

        let mut networks = HashMap::new();
        networks.insert(
            "frontend".to_string(),
            EndpointSettings {
                aliases: Some(vec!["web".to_string()]),
                ..Default::default()
            },
        );
        let mut files = HashMap::new();
        files.insert(
            "/etc/app.conf".to_string(),
            Bytes::from_static(b"archive:/etc/app.conf"),
        );

        runtime.add_container(MockContainer {
            id: "id-web".to_string(),
            name: "web".to_string(),
            running: true,
            config: ContainerConfig {
                image: Some("web:v1".to_string()),
                env: Some(vec!["MODE=prod".to_string()]),
                cmd: Some(vec!["serve".to_string()]),
                ..Default::default()
            },
            host_config: HostConfig {
                memory: Some(128 * 1024 * 1024),
                ..Default::default()
            },
            networks,
            files,
            uploads: Vec::new(),
        });
        runtime
    }

    pub fn add_image(&self, image: &str) {
        self.state.lock().unwrap().images.insert(image.to_string());
    }

    pub fn add_container(&self, container: MockContainer) {
        self.state.lock().unwrap().containers.push(container);
    }

    /// A stopped container with nothing but a name, like one left behind by
    /// an earlier failed swap.
    pub fn add_stale(&self, name: &str) {
        let id = format!("id-stale-{name}");
        self.add_container(MockContainer {
            id,
            name: name.to_string(),
            running: false,
            config: ContainerConfig {
                image: Some("web:v1".to_string()),
                ..Default::default()
            },
            host_config: HostConfig::default(),
            networks: HashMap::new(),
            files: HashMap::new(),
            uploads: Vec::new(),
        });
    }

    pub fn add_file(&self, container: &str, path: &str) {
        let mut state = self.state.lock().unwrap();
        let idx = state.position(container).expect("container exists");
        state.containers[idx]
            .files
            .insert(path.to_string(), Bytes::from(format!("archive:{path}")));
    }

    /// Fail the next `op` whose subject container (or path, for copy-out)
    /// matches `subject`, or any subject when `None`.
    pub fn fail(&self, op: Op, subject: Option<&str>, error: FailureFn) {
        self.state.lock().unwrap().failures.push(Failure {
            op,
            subject: subject.map(str::to_string),
            error,
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                matches!(
                    (op, call),
                    (Op::Inspect, Call::Inspect(_))
                        | (Op::CopyOut, Call::CopyOut { .. })
                        | (Op::Create, Call::Create { .. })
                        | (Op::Stop, Call::Stop(_))
                        | (Op::Start, Call::Start(_))
                        | (Op::CopyIn, Call::CopyIn { .. })
                        | (Op::Rename, Call::Rename { .. })
                        | (Op::Remove, Call::Remove(_))
                )
            })
            .count()
    }

    pub fn container(&self, key: &str) -> Option<MockContainer> {
        let state = self.state.lock().unwrap();
        state.position(key).map(|idx| state.containers[idx].clone())
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .state
            .lock()
            .unwrap()
            .containers
            .iter()
            .map(|c| c.name.clone())
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn inspect(&self, container: &str) -> Result<ContainerSnapshot> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Inspect(container.to_string()));
        if let Some(err) = state.injected(Op::Inspect, container) {
            return Err(err);
        }
        let idx = state
            .position(container)
            .ok_or_else(|| State::not_found(container))?;
        let found = &state.containers[idx];
        Ok(ContainerSnapshot {
            id: found.id.clone(),
            name: found.name.clone(),
            config: found.config.clone(),
            host_config: found.host_config.clone(),
            networks: found.networks.clone(),
        })
    }

    async fn copy_out(&self, container: &str, path: &str) -> Result<Bytes> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CopyOut {
            container: container.to_string(),
            path: path.to_string(),
        });
        if let Some(err) = state.injected(Op::CopyOut, path) {
            return Err(err);
        }
        let idx = state
            .position(container)
            .ok_or_else(|| State::not_found(container))?;
        state.containers[idx]
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| SwapError::FileNotFound {
                container: container.to_string(),
                path: path.to_string(),
                message: "Could not find the file in container".to_string(),
            })
    }

    async fn create(&self, spec: &NewContainerSpec) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create {
            name: spec.name.clone(),
            image: spec.image().to_string(),
        });
        if let Some(err) = state.injected(Op::Create, &spec.name) {
            return Err(err);
        }
        if state.position(&spec.name).is_some() {
            return Err(SwapError::NameConflict {
                name: spec.name.clone(),
                message: "Conflict. The container name is already in use".to_string(),
            });
        }
        if !state.images.contains(spec.image()) {
            return Err(SwapError::ImageNotFound {
                image: spec.image().to_string(),
                message: format!("No such image: {}", spec.image()),
            });
        }

        state.next_id += 1;
        let id = format!("id-new-{}", state.next_id);
        state.containers.push(MockContainer {
            id: id.clone(),
            name: spec.name.clone(),
            running: false,
            config: spec.config.clone(),
            host_config: spec.host_config.clone(),
            networks: spec.networking.endpoints_config.clone(),
            files: HashMap::new(),
            uploads: Vec::new(),
        });
        Ok(id)
    }

    async fn stop(&self, container: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Stop(container.to_string()));
        if let Some(err) = state.injected(Op::Stop, container) {
            return Err(err);
        }
        let idx = state
            .position(container)
            .ok_or_else(|| State::not_found(container))?;
        state.containers[idx].running = false;
        Ok(())
    }

    async fn start(&self, container: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Start(container.to_string()));
        if let Some(err) = state.injected(Op::Start, container) {
            return Err(err);
        }
        let idx = state
            .position(container)
            .ok_or_else(|| State::not_found(container))?;
        state.containers[idx].running = true;
        Ok(())
    }

    async fn copy_in(&self, container: &str, dir: &str, archive: Bytes) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CopyIn {
            container: container.to_string(),
            dir: dir.to_string(),
        });
        if let Some(err) = state.injected(Op::CopyIn, container) {
            return Err(err);
        }
        let idx = state
            .position(container)
            .ok_or_else(|| State::not_found(container))?;
        state.containers[idx]
            .uploads
            .push((dir.to_string(), archive));
        Ok(())
    }

    async fn rename(&self, container: &str, new_name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Rename {
            from: container.to_string(),
            to: new_name.to_string(),
        });
        if let Some(err) = state.injected(Op::Rename, container) {
            return Err(err);
        }
        let idx = state
            .position(container)
            .ok_or_else(|| State::not_found(container))?;
        if state.containers.iter().any(|c| c.name == new_name) {
            return Err(SwapError::NameConflict {
                name: new_name.to_string(),
                message: format!("Conflict. The container name \"/{new_name}\" is already in use"),
            });
        }
        state.containers[idx].name = new_name.to_string();
        Ok(())
    }

    async fn remove(&self, container: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Remove(container.to_string()));
        if let Some(err) = state.injected(Op::Remove, container) {
            return Err(err);
        }
        let idx = state
            .position(container)
            .ok_or_else(|| State::not_found(container))?;
        if state.containers[idx].running {
            return Err(SwapError::Operation {
                operation: "remove",
                message: "You cannot remove a running container".to_string(),
            });
        }
        state.containers.remove(idx);
        Ok(())
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
