//! Child partition of a CASE node.

/// Offsets that partition a CASE node's children.
///
/// Children are laid out as `[case?] (when then)* [else?]`. WHEN clause `i`
/// lives at `when_start + 2 * i` and its THEN clause right after it. The ELSE
/// clause, if any, sits at `when_end`. Replacing a child by index never moves
/// these offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaseWhenLayout {
    pub has_case: bool,
    pub has_else: bool,
    pub when_start: usize,
    pub when_end: usize,
}

impl CaseWhenLayout {
    /// Layout for `pairs` WHEN/THEN pairs.
    pub const fn new(has_case: bool, pairs: usize, has_else: bool) -> Self {
        let when_start = if has_case { 1 } else { 0 };
        Self {
            has_case,
            has_else,
            when_start,
            when_end: when_start + 2 * pairs,
        }
    }

    /// Number of WHEN/THEN pairs.
    pub const fn when_clause_size(&self) -> usize {
        (self.when_end - self.when_start) / 2
    }

    /// Child index of WHEN clause `i`.
    pub const fn when_index(&self, i: usize) -> usize {
        self.when_start + 2 * i
    }

    /// Child index of THEN clause `i`.
    pub const fn then_index(&self, i: usize) -> usize {
        self.when_index(i) + 1
    }

    /// Child index of the CASE operand.
    pub const fn case_index(&self) -> Option<usize> {
        if self.has_case { Some(0) } else { None }
    }

    /// Child index of the ELSE clause.
    pub const fn else_index(&self) -> Option<usize> {
        if self.has_else { Some(self.when_end) } else { None }
    }

    /// Total child count implied by the layout.
    pub const fn num_children(&self) -> usize {
        self.when_end + if self.has_else { 1 } else { 0 }
    }
}
