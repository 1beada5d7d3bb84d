//! CLI command implementations (split, merge, inspect).

pub mod split;
pub mod merge;
pub mod inspect;
