use std::{
    fmt, io,
    path::{Path, PathBuf},
};

/// Why a resource could not be turned into an in-memory table.
///
/// Every variant is fatal: the dashboard never renders with a partial store.
#[derive(Debug)]
pub enum LoadError {
    /// The file does not exist at the resolved path.
    NotFound { path: PathBuf },
    /// The file exists but could not be parsed (CSV, JSON, date or number).
    Malformed { path: PathBuf, detail: String },
    /// The file parsed but lacks a column, feature or property the dashboard needs.
    ShapeMismatch { path: PathBuf, detail: String },
}

impl LoadError {
    pub fn malformed(path: &Path, detail: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }

    pub fn shape(path: &Path, detail: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }

    /// Map an io failure on `path` onto the taxonomy.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            _ => Self::malformed(path, err.to_string()),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::Malformed { path, .. }
            | Self::ShapeMismatch { path, .. } => path,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Malformed { .. } => "malformed",
            Self::ShapeMismatch { .. } => "shape_mismatch",
        }
    }

    /// Find the `LoadError` at the bottom of an `anyhow` context chain.
    pub fn classify(err: &anyhow::Error) -> Option<&LoadError> {
        err.chain().find_map(|cause| cause.downcast_ref::<LoadError>())
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "resource not found: {}", path.display()),
            Self::Malformed { path, detail } => {
                write!(f, "malformed resource {}: {detail}", path.display())
            }
            Self::ShapeMismatch { path, detail } => {
                write!(f, "unexpected shape in {}: {detail}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {}
