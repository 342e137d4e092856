use caps::Capability;

use crate::{
    capability_set::CapabilitySet, error::CapabilityError, registry::CapabilityNameRegistry,
    transport::CapabilityTransport, vectors::CapabilityVectors,
};

/// Progress of a single `apply` call. Any failure ends the call with an
/// error; there is no partially-completed state to resume from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignmentState {
    Start,
    NamesValidated,
    ProcessAttached,
    VectorsComputed,
    VectorsCommitted,
    Done,
}

/// A validated request against an attached process, ready to be written.
#[derive(Clone, Debug)]
pub struct PendingAssignment {
    pub pid: i32,
    pub requested: CapabilitySet,
    pub before: CapabilityVectors,
    vectors: CapabilityVectors,
}

/// Outcome of a successful grant.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub pid: i32,
    pub requested: CapabilitySet,
    pub before: CapabilityVectors,
    /// Vectors read back after the commit, if the read succeeded.
    pub after: Option<CapabilityVectors>,
    /// Requested capabilities not held after a successful commit.
    pub inconsistencies: Vec<Capability>,
}

impl Assignment {
    pub fn is_consistent(&self) -> bool {
        self.inconsistencies.is_empty()
    }
}

pub struct AssignmentEngine<'r, T> {
    registry: &'r CapabilityNameRegistry,
    transport: T,
}

impl<'r, T: CapabilityTransport> AssignmentEngine<'r, T> {
    pub fn new(registry: &'r CapabilityNameRegistry, transport: T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Replaces every capability vector of `pid` with exactly the
    /// capabilities named in `requested`.
    pub fn apply<S: AsRef<str>>(
        &self,
        pid: i32,
        requested: &[S],
    ) -> Result<Assignment, CapabilityError> {
        let pending = self.prepare(pid, requested)?;
        self.commit(pending)
    }

    /// Validates every name and reads the current vectors of `pid`. Nothing
    /// is written.
    pub fn prepare<S: AsRef<str>>(
        &self,
        pid: i32,
        requested: &[S],
    ) -> Result<PendingAssignment, CapabilityError> {
        enter(pid, AssignmentState::Start);
        let requested = self.registry.resolve_all(requested)?;
        enter(pid, AssignmentState::NamesValidated);

        let before = self
            .transport
            .read_vectors(pid)
            .map_err(|e| CapabilityError::attach(pid, e))?;
        enter(pid, AssignmentState::ProcessAttached);

        let vectors = CapabilityVectors::uniform(requested);
        enter(pid, AssignmentState::VectorsComputed);

        Ok(PendingAssignment {
            pid,
            requested,
            before,
            vectors,
        })
    }

    /// Writes the vectors computed by `prepare`. A failure here is not
    /// rolled back.
    pub fn commit(&self, pending: PendingAssignment) -> Result<Assignment, CapabilityError> {
        let PendingAssignment {
            pid,
            requested,
            before,
            vectors,
        } = pending;
        self.transport
            .write_vectors(pid, &vectors)
            .map_err(|source| CapabilityError::ApplyFailed { pid, source })?;
        enter(pid, AssignmentState::VectorsCommitted);

        let after = match self.transport.read_vectors(pid) {
            Ok(after) => Some(after),
            Err(e) => {
                logger::warn!("failed to read back capabilities of {}: {}", pid, e);
                None
            }
        };
        let inconsistencies = match after {
            Some(after) => requested.difference(after.held()).capabilities(),
            None => Vec::new(),
        };
        for c in &inconsistencies {
            logger::warn!(
                "{} was applied to process {} but is not held afterwards",
                self.registry.name_of(*c).unwrap_or("unknown capability"),
                pid
            );
        }
        enter(pid, AssignmentState::Done);

        Ok(Assignment {
            pid,
            requested,
            before,
            after,
            inconsistencies,
        })
    }
}

fn enter(pid: i32, state: AssignmentState) {
    logger::debug!("capability assignment for {}: {:?}", pid, state);
}
