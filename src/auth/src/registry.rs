use std::collections::HashMap;

use caps::Capability;

use crate::{capability_set::CapabilitySet, error::CapabilityError};

pub const CAP_PREFIX: &str = "CAP_";

/// Canonical form of a user-supplied capability name: trimmed, uppercase,
/// `CAP_`-prefixed.
pub fn normalize(name: &str) -> String {
    let name = name.trim().to_uppercase();
    if name.starts_with(CAP_PREFIX) {
        name
    } else {
        format!("{}{}", CAP_PREFIX, name)
    }
}

/// Maps canonical capability names to the capabilities the running kernel
/// supports. Immutable once built.
#[derive(Debug)]
pub struct CapabilityNameRegistry {
    by_name: HashMap<String, Capability>,
    ordered: Vec<(String, Capability)>,
    last_cap: linux::Capability,
}

impl CapabilityNameRegistry {
    pub fn build() -> Self {
        let last_cap = linux::Capability::last_cap();
        logger::debug!("kernel supports capabilities up to {}", last_cap.0);
        Self::with_last_cap(last_cap)
    }

    pub fn with_last_cap(last_cap: linux::Capability) -> Self {
        let mut ordered = caps::all()
            .into_iter()
            .filter(|c| i32::from(c.index()) <= last_cap.0)
            .map(|c| (normalize(&c.to_string()), c))
            .collect::<Vec<_>>();
        ordered.sort_by_key(|(_, c)| c.index());
        let by_name = ordered.iter().cloned().collect();
        Self {
            by_name,
            ordered,
            last_cap,
        }
    }

    pub fn resolve(&self, name: &str) -> Result<Capability, CapabilityError> {
        let name = normalize(name);
        self.by_name
            .get(&name)
            .copied()
            .ok_or(CapabilityError::UnknownCapability { name })
    }

    /// Resolves every name, failing on the first unknown one.
    pub fn resolve_all<S: AsRef<str>>(&self, names: &[S]) -> Result<CapabilitySet, CapabilityError> {
        if names.is_empty() {
            return Err(CapabilityError::EmptyRequest);
        }
        names
            .iter()
            .map(|name| self.resolve(name.as_ref()))
            .collect()
    }

    /// `(name, capability)` pairs in ascending capability order.
    pub fn names(&self) -> impl Iterator<Item = (&str, Capability)> {
        self.ordered.iter().map(|(name, c)| (name.as_str(), *c))
    }

    pub fn name_of(&self, cp: Capability) -> Option<&str> {
        self.names().find(|(_, c)| *c == cp).map(|(name, _)| name)
    }

    pub fn all(&self) -> CapabilitySet {
        self.ordered.iter().map(|(_, c)| *c).collect()
    }

    pub fn last_cap(&self) -> linux::Capability {
        self.last_cap
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CapabilityNameRegistry {
        CapabilityNameRegistry::with_last_cap(linux::Capability::audit_read())
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("net_admin"), "CAP_NET_ADMIN");
        assert_eq!(normalize(" Cap_Sys_Admin "), "CAP_SYS_ADMIN");
        assert_eq!(normalize("CAP_CHOWN"), "CAP_CHOWN");
        assert_eq!(normalize(""), "CAP_");
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = registry();
        let expected = Capability::CAP_NET_ADMIN;
        assert_eq!(registry.resolve("net_admin").unwrap(), expected);
        assert_eq!(registry.resolve("NET_ADMIN").unwrap(), expected);
        assert_eq!(registry.resolve("CAP_NET_ADMIN").unwrap(), expected);
        assert_eq!(registry.resolve("cap_net_admin").unwrap(), expected);
    }

    #[test]
    fn test_resolve_is_stable() {
        let registry = registry();
        for (name, cap) in registry.names() {
            assert_eq!(registry.resolve(name).unwrap(), cap);
            assert_eq!(registry.resolve(name).unwrap(), cap);
        }
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = registry();
        match registry.resolve("NOT_A_REAL_CAP") {
            Err(CapabilityError::UnknownCapability { name }) => {
                assert_eq!(name, "CAP_NOT_A_REAL_CAP")
            }
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_bound_discards_newer_capabilities() {
        let registry = CapabilityNameRegistry::with_last_cap(linux::Capability::block_suspend());
        assert_eq!(registry.len(), 37);
        assert!(registry.resolve("BLOCK_SUSPEND").is_ok());
        assert!(matches!(
            registry.resolve("AUDIT_READ"),
            Err(CapabilityError::UnknownCapability { .. })
        ));
        assert_eq!(
            registry.all(),
            CapabilitySet::all_upto(linux::Capability::block_suspend())
        );
    }

    #[test]
    fn test_names_are_canonical_and_ordered() {
        let registry = registry();
        let names = registry.names().collect::<Vec<_>>();
        assert_eq!(names[0], ("CAP_CHOWN", Capability::CAP_CHOWN));
        assert!(names.windows(2).all(|w| w[0].1.index() < w[1].1.index()));
        assert!(names.iter().all(|(n, _)| n.starts_with(CAP_PREFIX)));
        assert_eq!(registry.name_of(Capability::CAP_SYS_ADMIN), Some("CAP_SYS_ADMIN"));
    }

    #[test]
    fn test_resolve_all() {
        let registry = registry();
        let set = registry
            .resolve_all(&["NET_ADMIN", "sys_admin", "CAP_NET_ADMIN"])
            .unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(Capability::CAP_NET_ADMIN));
        assert!(set.contains(Capability::CAP_SYS_ADMIN));

        assert!(matches!(
            registry.resolve_all::<&str>(&[]),
            Err(CapabilityError::EmptyRequest)
        ));
        assert!(matches!(
            registry.resolve_all(&["NET_ADMIN", ""]),
            Err(CapabilityError::UnknownCapability { .. })
        ));
    }

    #[test]
    fn test_build_uses_running_kernel() {
        let registry = CapabilityNameRegistry::build();
        assert!(!registry.is_empty());
        assert!(registry.resolve("CHOWN").is_ok());
    }
}
