use thiserror::Error;

/// Top-level error type for parasurf.
#[derive(Debug, Error)]
pub enum ParasurfError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Obj(#[from] ObjError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to surface shape parameters.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{vertex_count} vertices exceed the index type limit of {max_vertices}")]
    IndexRangeExceeded {
        vertex_count: usize,
        max_vertices: usize,
    },
}

/// Errors raised while reading or writing OBJ meshes.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Convenience type alias for results using [`ParasurfError`].
pub type Result<T> = std::result::Result<T, ParasurfError>;
