use std::str::FromStr;

use crate::{error::ResolveError, ContainerRuntime};

/// What to do when neither a pid nor a container name is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingTargetPolicy {
    /// Fail with `MissingTarget`.
    Reject,
    /// Target the calling process itself.
    CallingProcess,
}

impl Default for MissingTargetPolicy {
    fn default() -> Self {
        Self::Reject
    }
}

impl FromStr for MissingTargetPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(Self::Reject),
            "self" => Ok(Self::CallingProcess),
            _ => anyhow::bail!("unknown missing-target policy {:?}", s),
        }
    }
}

pub struct TargetResolver<R> {
    runtime: R,
    missing_target: MissingTargetPolicy,
}

impl<R: ContainerRuntime> TargetResolver<R> {
    pub fn new(runtime: R, missing_target: MissingTargetPolicy) -> Self {
        Self {
            runtime,
            missing_target,
        }
    }

    /// Pid to grant capabilities to. The container runtime is queried at
    /// most once and only when no explicit pid is given.
    pub fn resolve_pid(&self, explicit_pid: i32, container_name: &str) -> Result<i32, ResolveError> {
        if explicit_pid > 0 && !container_name.is_empty() {
            return Err(ResolveError::ConflictingTarget {
                pid: explicit_pid,
                name: container_name.to_string(),
            });
        }
        if explicit_pid < 0 {
            return Err(ResolveError::InvalidPid(explicit_pid));
        }
        if explicit_pid == 0 && container_name.is_empty() {
            return match self.missing_target {
                MissingTargetPolicy::Reject => Err(ResolveError::MissingTarget),
                MissingTargetPolicy::CallingProcess => Ok(nix::unistd::getpid().as_raw()),
            };
        }
        if explicit_pid > 0 {
            return Ok(explicit_pid);
        }

        let pid = self
            .runtime
            .main_process_id(container_name)
            .map_err(|source| ResolveError::ContainerLookupFailed {
                name: container_name.to_string(),
                source,
            })?;
        if pid <= 0 {
            return Err(ResolveError::ContainerNotRunning {
                name: container_name.to_string(),
            });
        }
        logger::debug!("container {} has main pid {}", container_name, pid);
        Ok(pid)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, collections::HashMap};

    use super::*;

    #[derive(Default)]
    struct StubRuntime {
        containers: HashMap<String, i32>,
        queries: Cell<usize>,
    }

    impl StubRuntime {
        fn with(name: &str, pid: i32) -> Self {
            let mut stub = Self::default();
            stub.containers.insert(name.to_string(), pid);
            stub
        }
    }

    impl ContainerRuntime for StubRuntime {
        fn main_process_id(&self, name: &str) -> anyhow::Result<i32> {
            self.queries.set(self.queries.get() + 1);
            match self.containers.get(name) {
                Some(pid) => Ok(*pid),
                None => anyhow::bail!("No such container: {}", name),
            }
        }
    }

    fn resolver(runtime: &StubRuntime) -> TargetResolver<&StubRuntime> {
        TargetResolver::new(runtime, MissingTargetPolicy::Reject)
    }

    #[test]
    fn test_conflicting_target() {
        for stub in [StubRuntime::with("x", 77), StubRuntime::default()] {
            match resolver(&stub).resolve_pid(5, "x") {
                Err(ResolveError::ConflictingTarget { pid, name }) => {
                    assert_eq!(pid, 5);
                    assert_eq!(name, "x");
                }
                r => panic!("unexpected result {:?}", r),
            }
            assert_eq!(stub.queries.get(), 0);
        }
    }

    #[test]
    fn test_explicit_pid_is_returned_unchanged() {
        let stub = StubRuntime::default();
        assert_eq!(resolver(&stub).resolve_pid(1234, "").unwrap(), 1234);
        assert_eq!(stub.queries.get(), 0);
    }

    #[test]
    fn test_negative_pid() {
        let stub = StubRuntime::default();
        assert!(matches!(
            resolver(&stub).resolve_pid(-3, ""),
            Err(ResolveError::InvalidPid(-3))
        ));
    }

    #[test]
    fn test_running_container() {
        let stub = StubRuntime::with("web", 4242);
        assert_eq!(resolver(&stub).resolve_pid(0, "web").unwrap(), 4242);
        assert_eq!(stub.queries.get(), 1);
    }

    #[test]
    fn test_stopped_container() {
        let stub = StubRuntime::with("web", 0);
        assert!(matches!(
            resolver(&stub).resolve_pid(0, "web"),
            Err(ResolveError::ContainerNotRunning { ref name }) if name == "web"
        ));
    }

    #[test]
    fn test_unknown_container() {
        let stub = StubRuntime::default();
        match resolver(&stub).resolve_pid(0, "db") {
            Err(ResolveError::ContainerLookupFailed { name, source }) => {
                assert_eq!(name, "db");
                assert!(source.to_string().contains("No such container"));
            }
            r => panic!("unexpected result {:?}", r),
        }
        assert_eq!(stub.queries.get(), 1);
    }

    #[test]
    fn test_missing_target_rejected() {
        let stub = StubRuntime::default();
        assert!(matches!(
            resolver(&stub).resolve_pid(0, ""),
            Err(ResolveError::MissingTarget)
        ));
    }

    #[test]
    fn test_missing_target_defaults_to_calling_process() {
        let stub = StubRuntime::default();
        let resolver = TargetResolver::new(&stub, MissingTargetPolicy::CallingProcess);
        assert_eq!(
            resolver.resolve_pid(0, "").unwrap(),
            nix::unistd::getpid().as_raw()
        );
        assert_eq!(stub.queries.get(), 0);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "reject".parse::<MissingTargetPolicy>().unwrap(),
            MissingTargetPolicy::Reject
        );
        assert_eq!(
            "self".parse::<MissingTargetPolicy>().unwrap(),
            MissingTargetPolicy::CallingProcess
        );
        assert!("always".parse::<MissingTargetPolicy>().is_err());
        assert_eq!(MissingTargetPolicy::default(), MissingTargetPolicy::Reject);
    }
}
