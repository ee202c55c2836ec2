use std::sync::Arc;

use common_config::RewriteConfig;
use quarry_core::{BuiltinCatalog, Catalog};

/// Read-only state shared by every rule during one compilation.
///
/// Cloning is cheap: the catalog is shared, never mutated.
#[derive(Clone)]
pub struct OptimizerContext {
    /// Function and type metadata snapshot.
    pub catalog: Arc<dyn Catalog>,
    /// Session rewrite configuration.
    pub config: RewriteConfig,
}

impl OptimizerContext {
    /// Create a context over `catalog` with the default configuration.
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            config: RewriteConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: RewriteConfig) -> Self {
        self.config = config;
        self
    }
}

impl Default for OptimizerContext {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinCatalog::with_builtins()))
    }
}

impl std::fmt::Debug for OptimizerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimizerContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
