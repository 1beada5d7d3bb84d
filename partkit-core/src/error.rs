use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PartKitError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Invalid chunk size: {0} (must be a positive number of bytes)")]
    InvalidChunkSize(u64),

    #[error("Too many fragments: a split may produce at most 4294967295 fragments")]
    TooManyFragments,

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("No fragment files found in {}", .0.display())]
    NoFragmentsFound(PathBuf),

    #[error("Malformed fragment name: {0}")]
    MalformedFragmentName(String),

    #[error("Mixed fragment set: expected fragments of {expected:?}, found {found:?}")]
    MixedFragments { expected: String, found: String },

    #[error("Duplicate fragment order: {0}")]
    DuplicateFragment(u32),

    #[error("Missing fragment order: {0}")]
    MissingFragment(u32),

    #[error("Invalid output name: {0}")]
    InvalidOutputName(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, PartKitError>;
