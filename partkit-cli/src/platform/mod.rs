//! Terminal implementations of core traits.

pub mod progress_bar;

pub use progress_bar::TerminalProgress;
