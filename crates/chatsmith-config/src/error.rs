//! Configuration engine error types.

/// Errors produced by the configuration engine.
///
/// Unknown or misplaced fields discovered during import are deliberately
/// *not* errors; they are returned as data from the validation module so a
/// caller can block the import or offer a partial one.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Two descriptors declared the same field id.
    #[error("duplicate field id '{0}' in field registry")]
    DuplicateFieldId(String),

    /// Two descriptors declared the same flat-file key.
    #[error("duplicate env key '{0}' in field registry")]
    DuplicateEnvKey(String),

    /// Two descriptors declared the same nested-document path.
    #[error("duplicate yaml path '{0}' in field registry")]
    DuplicateYamlPath(String),

    /// A descriptor declared neither a flat-file key nor a document path,
    /// so it could never be exported anywhere.
    #[error("field '{0}' declares neither an env key nor a yaml path")]
    Unplaceable(String),

    /// A field id was requested that the registry does not contain.
    #[error("unknown field id '{0}'")]
    UnknownField(String),

    /// The nested document failed to parse or emit. Parse failures are
    /// whole-input failures; there is no partial-document recovery.
    #[error("nested document error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A value tree failed to serialize or deserialize. Covers both the
    /// snapshot interchange format and document-to-tree conversion.
    #[error("malformed value tree: {0}")]
    ValueTree(#[from] serde_json::Error),

    /// Imported text exceeded the input size cap.
    #[error("input is {actual} bytes, exceeding the {limit} byte limit")]
    OversizedInput {
        /// Size of the rejected input in bytes.
        actual: usize,
        /// The enforced limit in bytes.
        limit: usize,
    },
}

/// Result type for configuration engine operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
