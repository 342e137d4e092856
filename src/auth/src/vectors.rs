use caps::Capability;

use crate::capability_set::CapabilitySet;

/// The four per-process capability vectors this crate reads and writes.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct CapabilityVectors {
    pub effective: CapabilitySet,
    pub permitted: CapabilitySet,
    pub inheritable: CapabilitySet,
    pub bounding: CapabilitySet,
}

impl CapabilityVectors {
    /// The same set in every vector. A grant is always written this way.
    pub const fn uniform(set: CapabilitySet) -> Self {
        Self {
            effective: set,
            permitted: set,
            inheritable: set,
            bounding: set,
        }
    }

    /// Capabilities present in all four vectors.
    pub const fn held(&self) -> CapabilitySet {
        self.effective
            .intersection(self.permitted)
            .intersection(self.inheritable)
            .intersection(self.bounding)
    }

    pub fn holds(&self, cp: Capability) -> bool {
        self.held().contains(cp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_requires_every_vector() {
        let mut v = CapabilityVectors::uniform(CapabilitySet::from_capability(
            Capability::CAP_NET_ADMIN,
        ));
        assert!(v.holds(Capability::CAP_NET_ADMIN));

        v.bounding = CapabilitySet::all_upto(linux::Capability::audit_read());
        v.effective.insert(Capability::CAP_SYS_ADMIN);
        assert!(v.holds(Capability::CAP_NET_ADMIN));
        assert!(!v.holds(Capability::CAP_SYS_ADMIN));

        v.inheritable = CapabilitySet::empty();
        assert!(!v.holds(Capability::CAP_NET_ADMIN));
    }
}
