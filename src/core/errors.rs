use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MlError>;

/// Every failure raised by the toolkit. Errors are reported to the immediate
/// caller; nothing inside the library retries.
#[derive(Error, Debug)]
pub enum MlError {
    /// A feature or class kind does not match what the learner supports.
    #[error("incompatible feature type: {0}")]
    IncompatibleFeatureType(String),

    /// An instance does not comply with the signature it is used with.
    #[error("incompatible instance: {0}")]
    IncompatibleInstance(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The classifier is not ready for the requested operation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("malformed data: {0}")]
    MalformedData(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("classifier '{0}' already exists")]
    ClassifierExists(String),
}

impl MlError {
    pub fn incompatible_feature_type<S: Into<String>>(msg: S) -> Self {
        MlError::IncompatibleFeatureType(msg.into())
    }

    pub fn incompatible_instance<S: Into<String>>(msg: S) -> Self {
        MlError::IncompatibleInstance(msg.into())
    }

    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        MlError::InvalidParameter(msg.into())
    }

    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        MlError::InvalidState(msg.into())
    }

    pub fn malformed_data<S: Into<String>>(msg: S) -> Self {
        MlError::MalformedData(msg.into())
    }

    /// Numeric error code, stable across releases.
    pub fn code(&self) -> u32 {
        match self {
            MlError::IncompatibleFeatureType(_) => 100,
            MlError::IncompatibleInstance(_) => 101,
            MlError::InvalidParameter(_) => 102,
            MlError::InvalidState(_) => 103,
            MlError::Io(_) | MlError::MalformedData(_) | MlError::Serialization(_) => 104,
            MlError::FileNotFound(_) => 105,
            MlError::ClassifierExists(_) => 200,
        }
    }
}
