//! Result and Error types for the decay scheme module

use std::path::PathBuf;

/// Type alias for `Result<T, decay::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `ensdf-decay`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// No data file at the resolved path
    #[error("no ENSDF file found at {path:?}")]
    FileNotFound { path: PathBuf },

    /// File contained no recognised ENSDF records
    #[error("no recognised ENSDF records in {path:?}")]
    EmptyFile { path: PathBuf },

    /// Generic error type for nom parser results
    #[error("parser failed: {0}")]
    ParseError(String),

    /// Element symbol not in the periodic table
    #[error("unknown element \"{0}\"")]
    UnknownElement(String),

    /// A member may only ever belong to one owner
    #[error("member is already attached to an owner")]
    MemberAlreadyOwned,

    /// Failure to serialise to a JSON string
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Relaxation mode not one of eadl, ensdf, or none
    #[error("unknown relaxation mode \"{0}\"")]
    UnknownRelaxationMode(String),
}
