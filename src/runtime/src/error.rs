use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no target given: set either a pid or a container name")]
    MissingTarget,

    #[error("pid {pid} and container {name:?} both given: set only one of them")]
    ConflictingTarget { pid: i32, name: String },

    #[error("invalid pid {0}")]
    InvalidPid(i32),

    #[error("failed to look up container {name:?}")]
    ContainerLookupFailed {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("container {name:?} is not running")]
    ContainerNotRunning { name: String },
}
