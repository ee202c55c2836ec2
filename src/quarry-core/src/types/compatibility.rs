//! Type compatibility lattice.
//!
//! Computes the single widening target for a binary comparison, the branches
//! of a CASE, or the operands of BETWEEN / IN. Failure to find a target is a
//! user-visible `TypeError`; callers never retry it.

use common_error::{QuarryError, QuarryResult};

use super::DataType;

/// How a string operand combines with a temporal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringTemporal {
    /// Compare as DATETIME regardless of the temporal side.
    Widen,
    /// Keep the temporal side's own type.
    KeepTemporal,
}

/// Compatible type for the two sides of a binary predicate.
pub fn compatible_type_for_binary(left: &DataType, right: &DataType) -> QuarryResult<DataType> {
    common_type(left, right, StringTemporal::Widen).ok_or_else(|| incompatible(&[left, right]))
}

/// Compatible type for a simple CASE operand and its WHEN clauses.
pub fn compatible_type_for_case_when(types: &[DataType]) -> QuarryResult<DataType> {
    fold_types(types, StringTemporal::Widen)
}

/// Compatible type for all operands of a BETWEEN or IN predicate.
///
/// Unlike the binary rule, a string mixed with a temporal type resolves to the
/// temporal type so that `d IN ('2024-01-01', ...)` keeps date semantics.
pub fn compatible_type_for_between_and_in(types: &[DataType]) -> QuarryResult<DataType> {
    fold_types(types, StringTemporal::KeepTemporal)
}

fn fold_types(types: &[DataType], mode: StringTemporal) -> QuarryResult<DataType> {
    let (first, rest) = types
        .split_first()
        .ok_or_else(|| QuarryError::invalid_parameter("no types to combine"))?;

    let mut result = first.clone();
    for ty in rest {
        result = common_type(&result, ty, mode).ok_or_else(|| {
            let all: Vec<&DataType> = types.iter().collect();
            incompatible(&all)
        })?;
    }
    Ok(result)
}

fn common_type(left: &DataType, right: &DataType, mode: StringTemporal) -> Option<DataType> {
    if left == right {
        return Some(left.clone());
    }

    match (left, right) {
        (DataType::Null, other) | (other, DataType::Null) => Some(other.clone()),

        (DataType::Array(a), DataType::Array(b)) => {
            common_type(a, b, mode).map(DataType::array)
        }

        (a, b) if a.is_string() && b.is_string() => Some(DataType::Varchar),

        (a, b) if a.is_integer() && b.is_integer() => {
            if a.integer_rank() >= b.integer_rank() {
                Some(a.clone())
            } else {
                Some(b.clone())
            }
        }
        (a, b) if a.is_numeric() && b.is_numeric() => Some(DataType::Double),

        (DataType::Boolean, n) | (n, DataType::Boolean) if n.is_integer() => Some(n.clone()),
        (DataType::Boolean, n) | (n, DataType::Boolean) if n.is_floating() => {
            Some(DataType::Double)
        }

        (s, n) | (n, s) if s.is_string() && n.is_numeric() => Some(DataType::Double),

        (DataType::Date, DataType::DateTime) | (DataType::DateTime, DataType::Date) => {
            Some(DataType::DateTime)
        }
        (s, t) | (t, s) if s.is_string() && t.is_temporal() => match mode {
            StringTemporal::Widen => Some(DataType::DateTime),
            StringTemporal::KeepTemporal => Some(t.clone()),
        },

        _ => None,
    }
}

fn incompatible(types: &[&DataType]) -> QuarryError {
    let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
    QuarryError::type_error(format!("no compatible type for {}", names.join(", ")))
}
