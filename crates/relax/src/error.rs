//! Result and Error types for the relaxation interfaces

/// Type alias for `Result<T, relax::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for `ensdf-relax`
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    /// Text could not be matched to an atomic shell
    #[error("failed to infer shell from \"{0}\"")]
    FailedToInferShell(String),

    /// Index outside of the supported shells
    #[error("shell index {0} is not supported")]
    ShellIndexOutOfRange(usize),

    /// Text could not be matched to a particle type
    #[error("failed to infer particle from \"{0}\"")]
    FailedToInferParticle(String),
}
