use serde::{Deserialize, Serialize};

use crate::types::DataType;

/// A resolved function signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Function {
    /// Function name, lower case.
    pub name: String,
    /// Fixed parameter types.
    pub arg_types: Vec<DataType>,
    /// Result type.
    pub return_type: DataType,
    /// Element type of trailing variadic arguments, if any.
    pub var_arg_type: Option<DataType>,
}

impl Function {
    /// Create a fixed-arity function.
    pub fn new(name: impl Into<String>, arg_types: Vec<DataType>, return_type: DataType) -> Self {
        Self {
            name: name.into().to_lowercase(),
            arg_types,
            return_type,
            var_arg_type: None,
        }
    }

    /// Create a variadic function. Arguments past `arg_types` take `var_arg_type`.
    pub fn variadic(
        name: impl Into<String>,
        arg_types: Vec<DataType>,
        var_arg_type: DataType,
        return_type: DataType,
    ) -> Self {
        Self {
            var_arg_type: Some(var_arg_type),
            ..Self::new(name, arg_types, return_type)
        }
    }

    /// Number of fixed parameters.
    pub fn num_args(&self) -> usize {
        self.arg_types.len()
    }

    /// Whether trailing variadic arguments are accepted.
    pub const fn has_var_args(&self) -> bool {
        self.var_arg_type.is_some()
    }

    /// Declared parameter type for argument position `i`.
    ///
    /// Positions past the fixed arity resolve to the variadic element type.
    pub fn param_type(&self, i: usize) -> Option<&DataType> {
        self.arg_types.get(i).or(self.var_arg_type.as_ref())
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, ty) in self.arg_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ty}")?;
        }
        if let Some(var) = &self.var_arg_type {
            if !self.arg_types.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "{var}...")?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}
