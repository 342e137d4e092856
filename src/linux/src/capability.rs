use std::path::Path;

pub const CAP_LAST_CAP_PATH: &str = "/proc/sys/kernel/cap_last_cap";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capability(pub i32);

impl Capability {
    pub const fn block_suspend() -> Self {
        Self(36)
    }
    pub const fn audit_read() -> Self {
        Self(37)
    }

    /// Upper bound used when the kernel does not publish `cap_last_cap`
    /// (RHEL6 and older).
    pub const fn fallback_last_cap() -> Self {
        Self::block_suspend()
    }

    /// Highest capability index the running kernel supports.
    pub fn last_cap() -> Self {
        Self::last_cap_from(CAP_LAST_CAP_PATH)
    }

    pub fn last_cap_from<P: AsRef<Path>>(path: P) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| parse_last_cap(&s))
            .unwrap_or_else(Self::fallback_last_cap)
    }
}

pub fn parse_last_cap(s: &str) -> Option<Capability> {
    match s.trim().parse::<i32>() {
        Ok(n) if (0..64).contains(&n) => Some(Capability(n)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_last_cap() {
        assert_eq!(parse_last_cap("40\n"), Some(Capability(40)));
        assert_eq!(parse_last_cap("36"), Some(Capability::block_suspend()));
        assert_eq!(parse_last_cap(""), None);
        assert_eq!(parse_last_cap("-1"), None);
        assert_eq!(parse_last_cap("64"), None);
    }

    #[test]
    fn test_last_cap_falls_back_without_procfs_entry() {
        let cap = Capability::last_cap_from("/nonexistent/cap_last_cap");
        assert_eq!(cap, Capability::fallback_last_cap());
    }
}
