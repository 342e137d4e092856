use std::time::Duration;

use anyhow::Context;
use docker_api::Docker;

use crate::ContainerRuntime;

pub const DEFAULT_DOCKER_ENDPOINT: &str = "unix:///var/run/docker.sock";

/// Docker daemon reached over its Unix socket. The endpoint is only
/// checked when a container is looked up.
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    endpoint: String,
    timeout: Duration,
}

impl DockerRuntime {
    /// `endpoint` is a socket path, with or without a `unix://` scheme.
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            timeout,
        }
    }

    async fn inspect_pid(&self, socket: &str, name: &str) -> anyhow::Result<i32> {
        let docker = Docker::unix(socket.to_string());
        let containers = docker.containers();
        let container = containers.get(name);
        let details = tokio::time::timeout(self.timeout, container.inspect())
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "docker at {} did not answer within {:?}",
                    socket,
                    self.timeout
                )
            })?
            .with_context(|| format!("failed to inspect container {}", name))?;
        i32::try_from(details.state.pid)
            .with_context(|| format!("container {} reported an invalid pid", name))
    }
}

impl ContainerRuntime for DockerRuntime {
    fn main_process_id(&self, name: &str) -> anyhow::Result<i32> {
        let socket = socket_path(&self.endpoint)?;
        logger::debug!("inspecting container {} via {}", name, socket);
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build tokio runtime")?;
        rt.block_on(self.inspect_pid(socket, name))
    }
}

fn socket_path(endpoint: &str) -> anyhow::Result<&str> {
    let path = match endpoint.split_once("://") {
        Some(("unix", path)) => path,
        Some((scheme, _)) => anyhow::bail!("unsupported docker endpoint scheme {:?}", scheme),
        None => endpoint,
    };
    if path.is_empty() {
        anyhow::bail!("empty docker socket path");
    }
    Ok(path)
}
