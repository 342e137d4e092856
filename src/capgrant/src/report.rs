use std::fmt::Write;

use auth::{Assignment, CapabilityNameRegistry, CapabilitySet, CapabilityVectors};

/// One `CAP_X: held` line per capability known to the registry.
pub fn render_state(registry: &CapabilityNameRegistry, vectors: &CapabilityVectors) -> String {
    render(registry, registry.all(), vectors)
}

/// One `CAP_X: held` line per requested capability.
pub fn render_requested(
    registry: &CapabilityNameRegistry,
    requested: CapabilitySet,
    vectors: &CapabilityVectors,
) -> String {
    render(registry, requested, vectors)
}

fn render(
    registry: &CapabilityNameRegistry,
    set: CapabilitySet,
    vectors: &CapabilityVectors,
) -> String {
    let mut out = String::new();
    for (name, c) in registry.names().filter(|(_, c)| set.contains(*c)) {
        let _ = writeln!(out, "{}: {}", name, vectors.holds(c));
    }
    out
}

/// What a committed grant left behind: the full post-state, then the
/// requested capabilities.
pub fn render_assignment(registry: &CapabilityNameRegistry, assignment: &Assignment) -> String {
    let after = match assignment.after {
        Some(after) => after,
        None => {
            return format!(
                "Capabilities of process {} could not be read back\n",
                assignment.pid
            )
        }
    };
    let mut out = String::new();
    let _ = writeln!(out, "Process {} capabilities after:", assignment.pid);
    out.push_str(&render_state(registry, &after));
    out.push('\n');
    out.push_str("Requested capabilities after:\n");
    out.push_str(&render_requested(registry, assignment.requested, &after));
    out
}

pub fn render_registry(registry: &CapabilityNameRegistry) -> String {
    let mut out = String::new();
    for (name, c) in registry.names() {
        let _ = writeln!(out, "{:>2} {}", c.index(), name);
    }
    out
}
