/// Namespace every built-in component type lives in.
pub const BUILTIN_NAMESPACE: &str = "com.google.appinventor.components.runtime";

/// Knobs for classification and tree building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Prefix joined with a short type name to look it up in the catalog.
    pub builtin_namespace: String,
    /// Build sibling subtrees and screens on the rayon pool.
    ///
    /// Ignored when the `parallel` feature is disabled.
    pub parallel: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            builtin_namespace: BUILTIN_NAMESPACE.to_owned(),
            parallel: true,
        }
    }
}

impl ResolverConfig {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub(crate) fn runs_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel
    }
}
