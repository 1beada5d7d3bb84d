//! Split and merge engines plus the buffered streaming they share.

pub mod splitter;
pub mod assembler;
mod stream;
