use num_format::{Locale, ToFormattedString};

const UNITS: [&str; 4] = ["kB", "MB", "GB", "TB"];

/// Human readable, signed size change of a du delta given in KiB.
///
/// Uses decimal units (`+1.0 kB` is 1024 bytes) and stops at TB.
pub fn fmt_delta(delta_kib: i64) -> String {
    let mut size = delta_kib as f64 * 1024.0;
    let mut unit = UNITS[0];
    for u in UNITS {
        size /= 1000.0;
        unit = u;
        if size.abs() < 1000.0 {
            break;
        }
    }
    let sign = if size.is_sign_negative() { '-' } else { '+' };
    let rounded = format!("{:.1}", size.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "0"));
    let grouped = match int_part.parse::<u64>() {
        Ok(n) => n.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    format!("{sign}{grouped}.{frac_part} {unit}")
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
