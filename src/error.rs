use std::sync::Arc;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// A malformed network address.
#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
#[error("invalid network address '{input}': {label} at position {}", .span.offset())]
#[diagnostic(
    code(oracle::address),
    help("addresses are eight hex byte groups separated by dots, e.g. 00.00.00.00.01.27.E4.48")
)]
pub struct AddressError {
    /// Original input that this failure came from.
    #[source_code]
    pub input: Arc<String>,

    /// Offset in chars of the error.
    #[label("{}", label)]
    pub span: SourceSpan,

    /// Label text for this span.
    pub label: String,
}

/// Errors raised while walking the directory tree.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FsError {
    #[error("No such directory '{0}'.")]
    NoSuchDirectory(String),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to access save store: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed save file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Reasons an account cannot be created.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AccountError {
    #[error("Username can't be empty.")]
    EmptyUsername,
    #[error("Sorry, that's taken ;)")]
    Reserved,
    #[error("Username already used.")]
    UsernameTaken,
    #[error("Username may only contain alphanumeric characters.")]
    NotAlphanumeric,
    #[error("Password can't be empty.")]
    EmptyPassword,
}

/// Everything that can go wrong while running a line of shell input.
///
/// None of these are fatal: the session reports them as text and returns to
/// reading commands.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{0} is not a known command.")]
    UnknownCommand(String),
    #[error("{0}")]
    Arguments(String),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error(transparent)]
    Save(#[from] SaveError),
    #[error("No website found at '{0}'.")]
    NoSuchWebsite(String),
    #[error("{0}")]
    Failed(String),
}

impl From<clap::Error> for ShellError {
    fn from(err: clap::Error) -> Self {
        // first paragraph only, usage and tips follow after a blank line
        let rendered = err.to_string();
        let message = rendered
            .lines()
            .take_while(|line| !line.trim().is_empty())
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(" ");
        ShellError::Arguments(message.trim_start_matches("error: ").to_string())
    }
}
