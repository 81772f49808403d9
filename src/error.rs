/// Errors raised while loading artifacts or running inference.
#[derive(Debug)]
pub enum OracleError {
    IoError(std::io::Error),
    SerializationError(String),
    InvalidVocabulary(String),
    ShapeMismatch(String),
    WindowLength { expected: usize, found: usize },
    TokenOutOfRange { index: usize, rows: usize },
    ConfigError(String),
}

impl std::fmt::Display for OracleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleError::IoError(err) => write!(f, "IO error: {}", err),
            OracleError::SerializationError(err) => write!(f, "Serialization error: {}", err),
            OracleError::InvalidVocabulary(msg) => write!(f, "Invalid vocabulary: {}", msg),
            OracleError::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
            OracleError::WindowLength { expected, found } => {
                write!(f, "Token window has length {}, model expects {}", found, expected)
            }
            OracleError::TokenOutOfRange { index, rows } => {
                write!(f, "Token index {} outside embedding table of {} rows", index, rows)
            }
            OracleError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for OracleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OracleError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OracleError {
    fn from(error: std::io::Error) -> Self {
        OracleError::IoError(error)
    }
}

impl From<serde_json::Error> for OracleError {
    fn from(error: serde_json::Error) -> Self {
        OracleError::SerializationError(error.to_string())
    }
}

impl From<bincode::Error> for OracleError {
    fn from(error: bincode::Error) -> Self {
        OracleError::SerializationError(error.to_string())
    }
}

impl From<ndarray::ShapeError> for OracleError {
    fn from(error: ndarray::ShapeError) -> Self {
        OracleError::ShapeMismatch(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OracleError>;
