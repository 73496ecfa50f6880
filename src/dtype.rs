use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide error type. Conversion failures are local to one input file in
/// batch mode; table errors indicate a broken static mapping and abort the
/// process at startup instead.
#[derive(Debug, Error)]
pub enum SnError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid glob pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    #[error("SMF parse error: {0}")]
    SmfParseError(String),

    #[error("SMF write error for {}: {}", .0.display(), .1)]
    SmfWriteFailed(PathBuf, String),

    #[error("No SuperNATURAL mapping for GM1 program {0}")]
    MissingToneMapping(u8),

    #[error("Tone {0} has no category assigned")]
    MissingToneCategory(&'static str),

    #[error("Category {0} has no bank select values")]
    MissingBankSelect(&'static str),

    #[error("Bank MSB {0} does not correspond to any Integra-7 tone bank type")]
    UnsupportedBankMsb(u8),

    #[error("{0}")]
    Invalid(String),
}
