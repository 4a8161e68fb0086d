use thiserror::Error;

/// Errors raised by catalog and policy table construction and lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Model id not present in the catalog
    #[error("model not found in catalog: {model}")]
    ModelNotFound {
        /// The id that failed to resolve
        model: String,
    },

    /// Task category not present in the policy table
    #[error("unknown task category: {category}")]
    UnknownTaskCategory {
        /// The category that failed to resolve
        category: String,
    },

    /// A policy references a model id the catalog does not contain
    #[error("policy '{category}' references unknown model '{model}'")]
    DanglingModelReference {
        /// The offending policy's category
        category: String,
        /// The id that failed to resolve
        model: String,
    },

    /// A policy was declared with no priority models
    #[error("policy '{category}' has an empty priority list")]
    EmptyPriorityList {
        /// The offending policy's category
        category: String,
    },

    /// The catalog was constructed with no models
    #[error("catalog contains no models")]
    EmptyCatalog,
}
