mod docker;
mod error;
mod resolver;

pub use docker::{DockerRuntime, DEFAULT_DOCKER_ENDPOINT};
pub use error::ResolveError;
pub use resolver::{MissingTargetPolicy, TargetResolver};

/// The one container runtime operation this crate needs.
pub trait ContainerRuntime {
    /// Pid of the main process of container `name`, `0` when the container
    /// exists but is not running.
    fn main_process_id(&self, name: &str) -> anyhow::Result<i32>;
}

impl<R: ContainerRuntime + ?Sized> ContainerRuntime for &R {
    fn main_process_id(&self, name: &str) -> anyhow::Result<i32> {
        (**self).main_process_id(name)
    }
}
