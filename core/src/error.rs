use thiserror::Error;

// ---------------------------------------------------------------------------
// Form errors
// ---------------------------------------------------------------------------

/// Errors raised while building a form from serialized data or while
/// writing through a path in strict mode.
///
/// Regular field and collection operations never fail; malformed input is
/// represented as `null` values and `false` validity entries instead.
#[derive(Debug, Error)]
pub enum FormError {
    /// A seed file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML seed document did not parse.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON seed document did not parse.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A tree root was a scalar instead of a mapping or an array.
    #[error("{tree} root must be a mapping or an array, found {found}")]
    InvalidRoot {
        tree: &'static str,
        found: &'static str,
    },

    /// A strict write met a value that cannot hold the next segment.
    #[error("cannot write through '{path}': segment '{segment}' collides with a {found} value")]
    PathCollision {
        path: String,
        segment: String,
        found: &'static str,
    },

    /// A strict write addressed an index too far past the end of its list.
    #[error("cannot write '{path}': index {index} is too far past the end of a list of {len}")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
}
