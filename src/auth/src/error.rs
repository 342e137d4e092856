use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The request named no capability at all.
    #[error("no capabilities requested")]
    EmptyRequest,

    #[error("unknown capability {name:?}")]
    UnknownCapability { name: String },

    #[error("process {pid} not found")]
    ProcessNotFound {
        pid: i32,
        #[source]
        source: io::Error,
    },

    /// The kernel refused to expose the capability state of `pid`.
    #[error("not permitted to inspect capabilities of process {pid}")]
    PermissionDenied {
        pid: i32,
        #[source]
        source: io::Error,
    },

    /// Reading the capability state of `pid` failed for a reason other
    /// than a missing process or a refusal.
    #[error("failed to read capabilities of process {pid}")]
    AttachFailed {
        pid: i32,
        #[source]
        source: io::Error,
    },

    /// The kernel rejected the new vectors. The target may be left
    /// partially updated.
    #[error("failed to apply capabilities to process {pid}")]
    ApplyFailed {
        pid: i32,
        #[source]
        source: io::Error,
    },
}

impl CapabilityError {
    pub(crate) fn attach(pid: i32, source: io::Error) -> Self {
        let errno = source.raw_os_error().map(nix::errno::Errno::from_i32);
        match (source.kind(), errno) {
            (io::ErrorKind::NotFound, _) | (_, Some(nix::errno::Errno::ESRCH)) => {
                Self::ProcessNotFound { pid, source }
            }
            (io::ErrorKind::PermissionDenied, _)
            | (_, Some(nix::errno::Errno::EPERM))
            | (_, Some(nix::errno::Errno::EACCES)) => Self::PermissionDenied { pid, source },
            _ => Self::AttachFailed { pid, source },
        }
    }
}
