use std::env;

use crate::constants::{
    BUFFER_SIZE, DELIMITER, ENV_BUFFER_SIZE, ENV_ORDER_WIDTH, FRAGMENT_SUFFIX, ORDER_WIDTH,
};
use crate::error::{PartKitError, Result};

/// Immutable settings shared by the splitter and the merger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentConfig {
    /// Size of the single working buffer used for every copy.
    pub buffer_size: usize,
    /// Separator between order, origin name and suffix.
    pub delimiter: char,
    /// Fragment suffix without the leading delimiter.
    pub suffix: String,
    /// Zero-padded width of the order prefix.
    pub order_width: usize,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            buffer_size: BUFFER_SIZE,
            delimiter: DELIMITER,
            suffix: FRAGMENT_SUFFIX.to_string(),
            order_width: ORDER_WIDTH,
        }
    }
}

impl FragmentConfig {
    /// Build a validated configuration.
    ///
    /// The suffix must not contain the delimiter, otherwise the origin name
    /// could not be recovered from a fragment name.
    pub fn new(
        buffer_size: usize,
        delimiter: char,
        suffix: impl Into<String>,
        order_width: usize,
    ) -> Result<Self> {
        let config = Self {
            buffer_size,
            delimiter,
            suffix: suffix.into(),
            order_width,
        };
        config.validate()?;
        Ok(config)
    }

    /// Default configuration with a different buffer size.
    pub fn with_buffer_size(buffer_size: usize) -> Result<Self> {
        let defaults = Self::default();
        Self::new(buffer_size, defaults.delimiter, defaults.suffix, defaults.order_width)
    }

    /// Load configuration from environment variables.
    ///
    /// - `PARTKIT_BUFFER_SIZE` (optional, default 1 MiB): working buffer in bytes.
    /// - `PARTKIT_ORDER_WIDTH` (optional, default 3): order prefix width.
    ///
    /// Unparsable or zero values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let buffer_size = positive_or(env::var(ENV_BUFFER_SIZE).ok(), defaults.buffer_size);
        let order_width = positive_or(env::var(ENV_ORDER_WIDTH).ok(), defaults.order_width);

        Self {
            buffer_size,
            order_width,
            ..defaults
        }
    }

    /// The full fragment extension, e.g. `.part`.
    pub fn extension(&self) -> String {
        format!("{}{}", self.delimiter, self.suffix)
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(PartKitError::Config("buffer size must be positive".into()));
        }
        if self.order_width == 0 {
            return Err(PartKitError::Config("order width must be positive".into()));
        }
        if self.delimiter.is_ascii_digit() {
            return Err(PartKitError::Config(format!(
                "delimiter {:?} must not be a digit",
                self.delimiter
            )));
        }
        if std::path::is_separator(self.delimiter) {
            return Err(PartKitError::Config(format!(
                "delimiter {:?} must not be a path separator",
                self.delimiter
            )));
        }
        if self.suffix.is_empty() {
            return Err(PartKitError::Config("fragment suffix must not be empty".into()));
        }
        if self.suffix.contains(self.delimiter) || self.suffix.contains(std::path::is_separator) {
            return Err(PartKitError::Config(format!(
                "fragment suffix {:?} must not contain the delimiter or a path separator",
                self.suffix
            )));
        }
        Ok(())
    }
}

/// Parse an optional setting as a positive integer, else use `default`.
fn positive_or(value: Option<String>, default: usize) -> usize {
    value
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(default)
}
