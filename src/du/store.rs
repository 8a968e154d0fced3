//! Snapshot files of a location: `<directory>/<location>/du-YYYY-MM-DD.gz`.

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

const PREFIX: &str = "du-";
const SUFFIX: &str = ".gz";

/// True for a strict `YYYY-MM-DD` calendar date.
pub fn is_snapshot_date(s: &str) -> bool {
    s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() })
        && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Locations are single directory names; anything with a dot or slash is refused.
pub fn is_valid_location(location: &str) -> bool {
    !location.is_empty() && !location.contains('.') && !location.contains('/') && !location.contains('\\')
}

pub fn snapshot_file_name(date: &str) -> String {
    format!("{PREFIX}{date}{SUFFIX}")
}

pub fn snapshot_path(location_dir: &Path, date: &str) -> PathBuf {
    location_dir.join(snapshot_file_name(date))
}

/// Date encoded in a snapshot file name, if it is one.
pub fn snapshot_date(file_name: &str) -> Option<&str> {
    let date = file_name.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
    is_snapshot_date(date).then_some(date)
}

/// Snapshot dates available in a location directory, oldest first.
pub fn list_snapshots(location_dir: &Path) -> io::Result<Vec<String>> {
    let mut dates: Vec<String> = std::fs::read_dir(location_dir)?
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().to_str().and_then(snapshot_date).map(str::to_string))
        .collect();
    dates.sort();
    Ok(dates)
}
