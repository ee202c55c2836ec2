//! Column references.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use quarry_core::DataType;

/// A reference to a column produced somewhere in a plan.
///
/// Identity is the numeric id alone. Two references with the same id denote
/// the same column even if their names differ.
#[derive(Debug, Clone)]
pub struct ColumnRef {
    /// Unique id within one plan.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Declared type.
    pub data_type: DataType,
    /// Whether the column may hold NULL.
    pub nullable: bool,
}

impl ColumnRef {
    /// Create a nullable column reference.
    pub fn new(id: u32, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id,
            name: name.into(),
            data_type,
            nullable: true,
        }
    }

    /// Set nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

impl PartialEq for ColumnRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ColumnRef {}

impl Hash for ColumnRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for ColumnRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ColumnRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Allocates column ids for one plan.
#[derive(Debug, Clone)]
pub struct ColumnRefFactory {
    next_id: u32,
}

impl Default for ColumnRefFactory {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl ColumnRefFactory {
    /// Create a factory whose first id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new nullable column.
    pub fn create(&mut self, name: impl Into<String>, data_type: DataType) -> ColumnRef {
        let id = self.next_id;
        self.next_id += 1;
        ColumnRef::new(id, name, data_type)
    }

    /// Number of columns allocated so far.
    pub fn allocated(&self) -> usize {
        (self.next_id - 1) as usize
    }
}
