use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{DataType, compatible_type_for_binary};

use super::{Catalog, Function};

/// In-memory function registry.
#[derive(Debug, Clone, Default)]
pub struct BuiltinCatalog {
    functions: HashMap<String, Vec<Arc<Function>>>,
}

impl BuiltinCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog seeded with the built-in scalar functions.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register(Function::new("abs", vec![DataType::Double], DataType::Double));
        catalog.register(Function::new("upper", vec![DataType::Varchar], DataType::Varchar));
        catalog.register(Function::variadic(
            "concat",
            vec![DataType::Varchar],
            DataType::Varchar,
            DataType::Varchar,
        ));
        catalog.register(Function::new(
            "substr",
            vec![DataType::Varchar, DataType::Int, DataType::Int],
            DataType::Varchar,
        ));
        catalog.register(Function::new(
            "array_sum",
            vec![DataType::array(DataType::BigInt)],
            DataType::BigInt,
        ));
        catalog.register(Function::new("year", vec![DataType::DateTime], DataType::Int));
        catalog
    }

    /// Register an overload. Overloads are tried in registration order.
    pub fn register(&mut self, function: Function) -> &mut Self {
        self.functions
            .entry(function.name.clone())
            .or_default()
            .push(Arc::new(function));
        self
    }

    /// Number of registered overloads.
    pub fn len(&self) -> usize {
        self.functions.values().map(Vec::len).sum()
    }

    /// Whether no function is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Catalog for BuiltinCatalog {
    fn lookup_function(&self, name: &str, arg_types: &[DataType]) -> Option<Arc<Function>> {
        let overloads = self.functions.get(&name.to_lowercase())?;

        let fixed = |f: &&Arc<Function>| !f.has_var_args() && f.num_args() == arg_types.len();

        overloads
            .iter()
            .filter(fixed)
            .find(|f| arg_types.iter().zip(&f.arg_types).all(|(a, p)| a.matches_type(p)))
            .or_else(|| {
                overloads
                    .iter()
                    .filter(fixed)
                    .find(|f| arg_types.iter().zip(&f.arg_types).all(|(a, p)| widens_to(a, p)))
            })
            .or_else(|| {
                overloads.iter().find(|f| {
                    f.has_var_args()
                        && arg_types.len() >= f.num_args()
                        && arg_types
                            .iter()
                            .enumerate()
                            .all(|(i, a)| f.param_type(i).is_some_and(|p| widens_to(a, p)))
                })
            })
            .cloned()
    }
}

fn widens_to(arg: &DataType, param: &DataType) -> bool {
    arg.matches_type(param) || compatible_type_for_binary(arg, param).is_ok_and(|t| t == *param)
}
