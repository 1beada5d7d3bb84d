/// Working buffer used while streaming bytes: 1 MiB.
pub const BUFFER_SIZE: usize = 1_048_576;

/// Chunk size used when the caller does not pick one: 1 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 1_048_576;

/// Separator between the order, the origin name and the suffix.
pub const DELIMITER: char = '.';

/// Suffix marking a file as a fragment (the extension is `DELIMITER` + this).
pub const FRAGMENT_SUFFIX: &str = "part";

/// Zero-padded width of the order prefix.
pub const ORDER_WIDTH: usize = 3;

/// Env var overriding the working buffer size.
pub const ENV_BUFFER_SIZE: &str = "PARTKIT_BUFFER_SIZE";

/// Env var overriding the order prefix width.
pub const ENV_ORDER_WIDTH: &str = "PARTKIT_ORDER_WIDTH";
