pub mod capability_set;
pub mod engine;
mod error;
pub mod registry;
pub mod transport;
pub mod vectors;

pub use capability_set::CapabilitySet;
pub use engine::{Assignment, AssignmentEngine, AssignmentState, PendingAssignment};
pub use error::CapabilityError;
pub use registry::CapabilityNameRegistry;
pub use transport::{CapabilityTransport, KernelTransport};
pub use vectors::CapabilityVectors;
