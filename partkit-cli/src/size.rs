//! Human size strings (`512B`, `64KB`, `10MB`, `2GB`) to byte counts.

const UNITS: [(&str, u64); 4] = [
    ("KB", 1024),
    ("MB", 1024 * 1024),
    ("GB", 1024 * 1024 * 1024),
    ("B", 1),
];

/// Parse a positive size with a unit suffix. Units are case-insensitive
/// powers of 1024.
pub fn parse_size(input: &str) -> Result<u64, String> {
    let invalid = || {
        format!("invalid size {input:?}: expected a positive number with unit (B, KB, MB, GB)")
    };

    let normalized = input.trim().to_ascii_uppercase();
    let (amount, multiplier) = UNITS
        .iter()
        .find_map(|(unit, mult)| normalized.strip_suffix(unit).map(|a| (a.trim(), *mult)))
        .ok_or_else(invalid)?;

    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let amount: u64 = amount.parse().map_err(|_| invalid())?;
    let bytes = amount
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size {input:?} is too large"))?;
    if bytes == 0 {
        return Err(invalid());
    }
    Ok(bytes)
}
