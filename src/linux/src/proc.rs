use std::io;

pub fn status_path(pid: i32) -> String {
    format!("/proc/{}/status", pid)
}

/// Reads the bounding set of `pid` from procfs. The kernel offers no
/// syscall for another process's bounding set.
pub fn bounding_set(pid: i32) -> io::Result<u64> {
    let status = std::fs::read_to_string(status_path(pid))?;
    parse_status_field(&status, "CapBnd").ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("no CapBnd line in {}", status_path(pid)),
        )
    })
}

pub fn parse_status_field(status: &str, field: &str) -> Option<u64> {
    status.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim() != field {
            return None;
        }
        u64::from_str_radix(value.trim(), 16).ok()
    })
}
