//! # Error Types
//!
//! Every failure the converter can hit is a [`ConvertError`]. Callers that only
//! need to decide what to do next (log, exit code) can collapse it into an
//! [`ErrorKind`].

use thiserror::Error;

/// Result alias used throughout the crate.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur while converting a dataset to ARFF
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    #[error("Incorrect dataset format, missing variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error("Incorrect shape for variable '{variable}': expected {expected:?}, found {found:?}")]
    Shape {
        variable: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Variable '{variable}' cannot be reduced to (time, x, y), on-disk shape {found:?}")]
    Rank { variable: String, found: Vec<usize> },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The dataset or the output file could not be opened, read or written.
    Io,
    /// The dataset opened fine but does not satisfy the fixed schema.
    MalformedInput,
    /// The job configuration could not be loaded.
    Config,
}

impl ErrorKind {
    /// Process exit status for this kind of failure.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Io => 1,
            ErrorKind::Config => 2,
            ErrorKind::MalformedInput => 3,
        }
    }
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Io(_) | ConvertError::NetCdf(_) => ErrorKind::Io,
            ConvertError::MissingVariables(_)
            | ConvertError::Shape { .. }
            | ConvertError::Rank { .. } => {
                ErrorKind::MalformedInput
            }
            ConvertError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}
