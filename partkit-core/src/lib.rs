//! Streaming file splitter and merger.
//!
//! A source file is cut into ordered fragment files named
//! `{order}.{origin}.part`; the merger finds those fragments again, orders
//! them by their numeric prefix, concatenates them and removes them.

pub mod error;
pub mod constants;
pub mod config;
pub mod traits;
pub mod fragment;
pub mod chunking;

pub use chunking::assembler::{MergedFile, Merger};
pub use chunking::splitter::Splitter;
pub use config::FragmentConfig;
pub use error::{PartKitError, Result};
pub use fragment::Fragment;

#[cfg(test)]
mod proptests;
