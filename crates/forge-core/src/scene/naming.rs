//! Unique display names for new nodes

use std::collections::HashSet;

const COPY_MARKER: &str = " (Copy";

/// Strip trailing ` (Copy)` / ` (Copy N)` suffixes
pub fn strip_copy_suffix(name: &str) -> &str {
    let mut root = name.trim_end();
    while let Some(open) = root.rfind(COPY_MARKER) {
        let rest = &root[open + COPY_MARKER.len()..];
        let is_suffix = rest == ")"
            || rest
                .strip_prefix(' ')
                .and_then(|r| r.strip_suffix(')'))
                .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()));
        if !is_suffix {
            break;
        }
        root = root[..open].trim_end();
    }
    root
}

/// Name for a copy of `name`: `"<root> (Copy)"`, then `"<root> (Copy 2)"`, ...
pub fn copy_name(name: &str, taken: &HashSet<String>) -> String {
    let root = strip_copy_suffix(name);
    let first = format!("{root} (Copy)");
    if !taken.contains(&first) {
        return first;
    }
    (2..)
        .map(|n| format!("{root} (Copy {n})"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(first)
}

/// First free `"<prefix> N"` with N starting at 1
pub fn indexed_name(prefix: &str, taken: &HashSet<String>) -> String {
    (1..)
        .map(|n| format!("{prefix} {n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| prefix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strip_copy_suffix() {
        assert_eq!(strip_copy_suffix("Box 1"), "Box 1");
        assert_eq!(strip_copy_suffix("Box 1 (Copy)"), "Box 1");
        assert_eq!(strip_copy_suffix("Box 1 (Copy 12)"), "Box 1");
        assert_eq!(strip_copy_suffix("Box 1 (Copy) (Copy 2)"), "Box 1");
        assert_eq!(strip_copy_suffix("Box (Copyright)"), "Box (Copyright)");
    }

    #[test]
    fn test_copy_names() {
        assert_eq!(copy_name("Box 1", &taken(&["Box 1"])), "Box 1 (Copy)");
        assert_eq!(
            copy_name("Box 1", &taken(&["Box 1", "Box 1 (Copy)"])),
            "Box 1 (Copy 2)"
        );
        assert_eq!(
            copy_name("Box 1 (Copy)", &taken(&["Box 1", "Box 1 (Copy)", "Box 1 (Copy 2)"])),
            "Box 1 (Copy 3)"
        );
    }

    #[test]
    fn test_indexed_names() {
        assert_eq!(indexed_name("Group", &taken(&[])), "Group 1");
        assert_eq!(indexed_name("Box", &taken(&["Box 1", "Box 3"])), "Box 2");
    }
}
