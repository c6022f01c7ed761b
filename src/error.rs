//! Error taxonomy and exit-code mapping.
//!
//! Every failure surfaces to the dispatcher as an [`Error`]. Only the
//! binary turns these into process exit codes; nothing below it exits.
//!
//! | Variant | Exit code | Meaning |
//! |---------|-----------|---------|
//! | [`Error::Usage`] | 2 | bad subcommand, option, or identifier |
//! | [`Error::Config`] | 2 | config file unreadable or invalid |
//! | [`Error::Load`] | 3 | corpus missing or corrupt (packaging problem) |
//! | [`Error::NotFound`] | 4 | no entry with the requested identifier |
//! | [`Error::Output`] | 1 | writing the result failed |
//!
//! Broken cross-references are deliberately absent: they are reported as
//! warnings and never abort rendering.

use std::path::PathBuf;

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_LOAD: i32 = 3;
pub const EXIT_NOT_FOUND: i32 = 4;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("invalid configuration: {0:#}")]
    Config(anyhow::Error),

    #[error("failed to load documentation corpus: {0}")]
    Load(#[from] LoadError),

    #[error("no such entry: {0}")]
    NotFound(String),

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) | Error::Config(_) => EXIT_USAGE,
            Error::Load(_) => EXIT_LOAD,
            Error::NotFound(_) => EXIT_NOT_FOUND,
            Error::Output(_) => EXIT_FAILURE,
        }
    }

    /// Short hint printed after the message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Usage(_) => Some("run `apidocs --help` for usage"),
            Error::NotFound(_) => Some("run `apidocs search <text>` to find identifiers"),
            Error::Load(_) => Some("the documentation data is missing or damaged"),
            Error::Config(_) | Error::Output(_) => None,
        }
    }
}

/// Why the corpus could not be built.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("entry #{index} has an empty identifier")]
    EmptyId { index: usize },

    #[error("identifier '{id}' contains whitespace")]
    InvalidId { id: String },

    #[error("entry '{id}' has an empty title")]
    EmptyTitle { id: String },

    #[error("duplicate identifier '{id}'")]
    DuplicateId { id: String },

    #[error("entry '{id}' reference #{index} is empty")]
    EmptyReference { id: String, index: usize },

    #[error("entry '{id}' has more than one {language} example")]
    DuplicateExample { id: String, language: String },

    #[error("entry '{id}' example #{index} has no language and none could be inferred")]
    UnknownExampleLanguage { id: String, index: usize },
}
