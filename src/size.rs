//! Human-readable byte counts

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;
const GB: u64 = 1024 * 1024 * 1024;

/// Formats a byte count for display.
///
/// Divides by powers of 1024 but labels the result KB/MB/GB, not KiB/MiB/GiB.
/// Peers compare these strings verbatim, so the labels must stay as they are.
pub fn format_file_size(size: u64) -> String {
    if size < KB {
        format!("{} bytes", size)
    } else if size < MB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else if size < GB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else {
        format!("{:.2} GB", size as f64 / GB as f64)
    }
}

/// Parse a size string (e.g., "5MB", "100KB") into bytes
pub fn parse_size(size_str: &str) -> Option<u64> {
    let size_str = size_str.trim().to_uppercase();

    let (num_str, multiplier) = if let Some(num) = size_str.strip_suffix("GB") {
        (num, GB)
    } else if let Some(num) = size_str.strip_suffix("MB") {
        (num, MB)
    } else if let Some(num) = size_str.strip_suffix("KB") {
        (num, KB)
    } else if let Some(num) = size_str.strip_suffix('B') {
        (num, 1)
    } else {
        // Assume bytes if no suffix
        (size_str.as_str(), 1)
    };

    let num: f64 = num_str.trim().parse().ok()?;
    if !num.is_finite() || num < 0.0 {
        return None;
    }

    Some((num * multiplier as f64) as u64)
}
