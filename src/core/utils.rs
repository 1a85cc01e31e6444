/// Bytes in one mebibyte.
pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Formats a byte count as mebibytes with one decimal place.
///
/// Returns `None` when the size is unknown or zero, so callers can omit the
/// size entirely instead of showing "0.0 MB".
///
/// # Example
///
/// ```
/// use ytrelay::core::utils::format_size_mib;
///
/// assert_eq!(format_size_mib(Some(15_728_640)).as_deref(), Some("15.0 MB"));
/// assert_eq!(format_size_mib(Some(0)), None);
/// assert_eq!(format_size_mib(None), None);
/// ```
pub fn format_size_mib(size_bytes: Option<u64>) -> Option<String> {
    match size_bytes {
        Some(bytes) if bytes > 0 => Some(format!("{:.1} MB", bytes as f64 / BYTES_PER_MIB)),
        _ => None,
    }
}

/// Progress suffix for the polling message: ".", "..", "..." and back again.
pub fn progress_dots(attempt: u32) -> String {
    ".".repeat((attempt % 3) as usize + 1)
}
