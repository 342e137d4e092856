use caps::Capability;

/// A set of capabilities as the kernel stores it: bit `i` is capability
/// index `i`.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct CapabilitySet(pub u64);

impl CapabilitySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn from_capability(cp: Capability) -> CapabilitySet {
        CapabilitySet(1u64 << cp.index())
    }

    /// Every capability up to and including `last`.
    pub const fn all_upto(last: linux::Capability) -> Self {
        if last.0 >= 63 {
            Self(u64::MAX)
        } else {
            Self((1 << (last.0 + 1)) - 1)
        }
    }

    pub fn insert(&mut self, cp: Capability) {
        self.0 |= Self::from_capability(cp).0;
    }

    pub fn remove(&mut self, cp: Capability) {
        self.0 &= !Self::from_capability(cp).0;
    }

    pub fn contains(&self, cp: Capability) -> bool {
        self.0 & Self::from_capability(cp).0 != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members known to the `caps` crate, in ascending index order.
    pub fn capabilities(&self) -> Vec<Capability> {
        let mut all = caps::all()
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect::<Vec<_>>();
        all.sort_by_key(|c| c.index());
        all
    }
}

impl std::iter::FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = CapabilitySet::empty();
        for c in iter {
            set.insert(c);
        }
        set
    }
}
