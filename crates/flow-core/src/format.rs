//! Display formatting for timestamps, durations, and file sizes.

/// Seconds into the video as `m:ss`, used for search hits and story scenes.
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0).floor() as i64;
    let secs = (seconds % 60.0).floor() as i64;
    format!("{}:{:02}", mins, secs)
}

/// Video duration as `m:ss`, or `Unknown` when the backend did not report
/// one. A reported zero also reads as unknown.
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s > 0.0 => format_timestamp(s),
        _ => "Unknown".to_string(),
    }
}

/// Duration with an hours component once it is an hour or longer
/// (`h:mm:ss`, otherwise `m:ss`).
pub fn format_clock(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as i64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as i64;
    let secs = (seconds % 60.0).floor() as i64;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Byte count in the largest fitting unit, trimmed to at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    format!("{} {}", trim_decimals(value), UNITS[exponent])
}

// "1.00" -> "1", "1.50" -> "1.5", "1.23" -> "1.23"
fn trim_decimals(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}
