//! Display utilities for Quarry.
//!
//! Provides box-drawing tree rendering for plan explain output.

mod tree;

pub use tree::{DisplayTree, TreeNode};

/// Indent every line of a multi-line string with `prefix`.
pub fn indent(s: &str, prefix: &str) -> String {
    s.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent() {
        assert_eq!(indent("a\nb", "  "), "  a\n  b");
        assert_eq!(indent("", "  "), "");
    }
}
