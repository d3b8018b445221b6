use std::path::PathBuf;

use thiserror::Error;

/// Rejections raised while building up a model. Every check runs before the
/// model mutates, so a failed call leaves it exactly as it was.
#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("segment carries both sigma and rho, expected exactly one")]
    ConflictingMaterial,

    #[error("segment carries neither sigma nor rho, expected exactly one")]
    MissingMaterial,

    #[error("unknown unit '{0}', expected one of km, m, cm, mm, um, in, mils")]
    UnknownUnit(String),
}

/// Failures raised while serializing a model.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("no port list has been set on the model")]
    PortsNotSet,

    #[error("port {index} references net '{net}' which no segment terminal carries")]
    UnknownPortNet { index: usize, net: String },

    #[error("{path} already exists, pass force to overwrite it")]
    AlreadyExists { path: PathBuf },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<(), ArgumentError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ArgumentError::NonFinite { field, value })
    }
}
