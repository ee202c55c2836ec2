//! SQL scalar data types.

use serde::{Deserialize, Serialize};

/// Data type of a scalar expression or column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Type of an untyped NULL literal.
    Null,
    /// Boolean type.
    Boolean,
    /// 8-bit signed integer.
    TinyInt,
    /// 16-bit signed integer.
    SmallInt,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    BigInt,
    /// 128-bit signed integer.
    LargeInt,
    /// Single-precision floating point.
    Float,
    /// Double-precision floating point.
    Double,
    /// Variable-length string.
    Varchar,
    /// Fixed-length string.
    Char,
    /// Calendar date.
    Date,
    /// Date and time of day, second precision.
    DateTime,
    /// Array of elements of the given type.
    Array(Box<Self>),
}

impl DataType {
    /// Create an array type.
    pub fn array(item: Self) -> Self {
        Self::Array(Box::new(item))
    }

    /// Check if this type is the untyped NULL type.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if this type is boolean.
    pub const fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean)
    }

    /// Check if this type is an integer type.
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::TinyInt | Self::SmallInt | Self::Int | Self::BigInt | Self::LargeInt
        )
    }

    /// Check if this type is a floating point type.
    pub const fn is_floating(&self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Check if this type is numeric.
    pub const fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    /// Check if this type is a string type.
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::Varchar | Self::Char)
    }

    /// Check if this type is a temporal type.
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }

    /// Check if this type is an array type.
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Element type of an array type.
    pub fn item_type(&self) -> Option<&Self> {
        match self {
            Self::Array(item) => Some(item),
            _ => None,
        }
    }

    /// Whether a value of `other` can be used where `self` is required without
    /// a conversion.
    ///
    /// This is not equality: the two string types match each other, and
    /// arrays match when their element types do.
    pub fn matches_type(&self, other: &Self) -> bool {
        match (self, other) {
            (a, b) if a == b => true,
            (a, b) if a.is_string() && b.is_string() => true,
            (Self::Array(a), Self::Array(b)) => a.matches_type(b),
            _ => false,
        }
    }

    /// Width rank among integer types, smallest first.
    pub(crate) const fn integer_rank(&self) -> Option<u8> {
        match self {
            Self::TinyInt => Some(1),
            Self::SmallInt => Some(2),
            Self::Int => Some(3),
            Self::BigInt => Some(4),
            Self::LargeInt => Some(5),
            _ => None,
        }
    }

    /// Get the SQL display name for this type.
    pub fn display_name(&self) -> String {
        match self {
            Self::Null => "NULL_TYPE".to_string(),
            Self::Boolean => "BOOLEAN".to_string(),
            Self::TinyInt => "TINYINT".to_string(),
            Self::SmallInt => "SMALLINT".to_string(),
            Self::Int => "INT".to_string(),
            Self::BigInt => "BIGINT".to_string(),
            Self::LargeInt => "LARGEINT".to_string(),
            Self::Float => "FLOAT".to_string(),
            Self::Double => "DOUBLE".to_string(),
            Self::Varchar => "VARCHAR".to_string(),
            Self::Char => "CHAR".to_string(),
            Self::Date => "DATE".to_string(),
            Self::DateTime => "DATETIME".to_string(),
            Self::Array(item) => format!("ARRAY<{}>", item.display_name()),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_type_is_not_equality() {
        assert!(DataType::Varchar.matches_type(&DataType::Char));
        assert!(DataType::Char.matches_type(&DataType::Varchar));
        assert!(DataType::Int.matches_type(&DataType::Int));
        assert!(!DataType::Int.matches_type(&DataType::BigInt));
        assert!(!DataType::Float.matches_type(&DataType::Double));
        assert!(!DataType::Null.matches_type(&DataType::Int));
    }

    #[test]
    fn test_array_matching() {
        let chars = DataType::array(DataType::Char);
        let varchars = DataType::array(DataType::Varchar);
        assert!(chars.matches_type(&varchars));
        assert!(!DataType::array(DataType::Int).matches_type(&DataType::array(DataType::BigInt)));
        assert!(!DataType::array(DataType::Int).matches_type(&DataType::Int));
    }

    #[test]
    fn test_classification() {
        assert!(DataType::LargeInt.is_integer());
        assert!(DataType::Float.is_floating());
        assert!(DataType::Double.is_numeric());
        assert!(!DataType::Boolean.is_numeric());
        assert!(DataType::Char.is_string());
        assert!(DataType::DateTime.is_temporal());
        assert_eq!(
            DataType::array(DataType::Null).item_type(),
            Some(&DataType::Null)
        );
        assert_eq!(DataType::Int.item_type(), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(DataType::BigInt.to_string(), "BIGINT");
        assert_eq!(
            DataType::array(DataType::array(DataType::Varchar)).to_string(),
            "ARRAY<ARRAY<VARCHAR>>"
        );
    }
}
