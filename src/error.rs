use thiserror::Error;

/// Errors raised for caller mistakes. Physically out-of-range cell values are never
/// errors, they become missing (NaN) in the output grids.
#[derive(Error, Debug)]
pub enum PtJplError {
    #[error("grid '{name}' has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        name: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("grid '{0}' is empty")]
    EmptyGrid(&'static str),

    #[error("invalid parameter '{name}': {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse parameter file: {0}")]
    Toml(#[from] toml::de::Error),
}
