use crate::config::FragmentConfig;
use crate::error::{PartKitError, Result};

/// Order and origin name recovered from a fragment file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub order: u32,
    pub origin_name: String,
}

/// Build a fragment name: `{order}{delimiter}{origin}{delimiter}{suffix}`.
///
/// The order is zero-padded to `config.order_width`; larger orders simply
/// render wider.
pub fn render(order: u32, origin_name: &str, config: &FragmentConfig) -> String {
    format!(
        "{order:0width$}{delim}{origin_name}{ext}",
        width = config.order_width,
        delim = config.delimiter,
        ext = config.extension(),
    )
}

/// Whether a file name carries the fragment extension.
pub fn has_fragment_extension(file_name: &str, config: &FragmentConfig) -> bool {
    file_name.ends_with(&config.extension())
}

/// Parse a fragment file name back into its order and origin name.
///
/// The order is the leading digit run before the first delimiter. The origin
/// name is everything between the first and the last delimiter, so origin
/// names that contain the delimiter themselves (`archive.tar.gz`) survive.
pub fn parse(file_name: &str, config: &FragmentConfig) -> Result<ParsedName> {
    let malformed = || PartKitError::MalformedFragmentName(file_name.to_string());

    if !has_fragment_extension(file_name, config) {
        return Err(malformed());
    }

    let delim = config.delimiter;
    let first = file_name.find(delim).ok_or_else(malformed)?;
    let last = file_name.rfind(delim).ok_or_else(malformed)?;
    if first >= last {
        return Err(malformed());
    }

    let order_str = &file_name[..first];
    if order_str.is_empty() || !order_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let order: u32 = order_str.parse().map_err(|_| malformed())?;
    if order == 0 {
        return Err(malformed());
    }

    let origin_name = &file_name[first + delim.len_utf8()..last];
    if origin_name.is_empty() {
        return Err(malformed());
    }

    Ok(ParsedName {
        order,
        origin_name: origin_name.to_string(),
    })
}
