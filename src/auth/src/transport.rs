use std::io;

use caps::CapSet;

use crate::{capability_set::CapabilitySet, vectors::CapabilityVectors};

/// Reads and writes the capability vectors of a process.
pub trait CapabilityTransport {
    fn read_vectors(&self, pid: i32) -> io::Result<CapabilityVectors>;

    /// Replaces the vectors of `pid`. The bounding set is written before
    /// the standard three.
    fn write_vectors(&self, pid: i32, vectors: &CapabilityVectors) -> io::Result<()>;
}

impl<T: CapabilityTransport + ?Sized> CapabilityTransport for &T {
    fn read_vectors(&self, pid: i32) -> io::Result<CapabilityVectors> {
        (**self).read_vectors(pid)
    }

    fn write_vectors(&self, pid: i32, vectors: &CapabilityVectors) -> io::Result<()> {
        (**self).write_vectors(pid, vectors)
    }
}

/// Talks to the running kernel through capget(2), capset(2), prctl(2) and
/// `/proc/<pid>/status`.
#[derive(Debug, Clone, Copy)]
pub struct KernelTransport {
    last_cap: linux::Capability,
}

impl KernelTransport {
    pub fn new(last_cap: linux::Capability) -> Self {
        Self { last_cap }
    }

    fn set_bounding(&self, pid: i32, value: CapabilitySet) -> io::Result<()> {
        let current = CapabilitySet(linux::proc::bounding_set(pid)?);
        let to_drop = current
            .difference(value)
            .intersection(CapabilitySet::all_upto(self.last_cap));
        if to_drop.is_empty() {
            return Ok(());
        }
        if !is_calling_thread(pid) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!(
                    "the bounding set of process {} can only be reduced by that process",
                    pid
                ),
            ));
        }
        for c in to_drop.capabilities() {
            caps::drop(None, CapSet::Bounding, c)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        }
        Ok(())
    }
}

fn is_calling_thread(pid: i32) -> bool {
    pid == nix::unistd::getpid().as_raw() || pid == nix::unistd::gettid().as_raw()
}

impl CapabilityTransport for KernelTransport {
    fn read_vectors(&self, pid: i32) -> io::Result<CapabilityVectors> {
        let standard = linux::capget(pid)?;
        let bounding = linux::proc::bounding_set(pid)?;
        Ok(CapabilityVectors {
            effective: CapabilitySet(standard.effective),
            permitted: CapabilitySet(standard.permitted),
            inheritable: CapabilitySet(standard.inheritable),
            bounding: CapabilitySet(bounding),
        })
    }

    fn write_vectors(&self, pid: i32, vectors: &CapabilityVectors) -> io::Result<()> {
        // dropping bounding bits needs CAP_SETPCAP, which the capset below
        // may take away
        self.set_bounding(pid, vectors.bounding)?;
        linux::capset(
            pid,
            linux::CapUserVectors {
                effective: vectors.effective.0,
                permitted: vectors.permitted.0,
                inheritable: vectors.inheritable.0,
            },
        )?;
        Ok(())
    }
}
