//! Parsing and diffing of `du` output snapshots.
//!
//! A snapshot is the raw output of `du` (one `<KiB><whitespace><path>` line per
//! directory), usually stored gzipped. Diffing two snapshots yields the size
//! change of every path present in either one.

pub mod store;

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DuError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Sizes in KiB keyed by the raw path bytes of a `du` listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuSnapshot {
    sizes: HashMap<Vec<u8>, i64>,
}

impl DuSnapshot {
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn size(&self, path: &str) -> Option<i64> {
        self.sizes.get(path.as_bytes()).copied()
    }
}

impl FromIterator<(Vec<u8>, i64)> for DuSnapshot {
    fn from_iter<I: IntoIterator<Item = (Vec<u8>, i64)>>(iter: I) -> Self {
        Self { sizes: iter.into_iter().collect() }
    }
}

/// Size change of one path between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeltaRow {
    /// KiB, new minus old.
    pub delta: i64,
    pub path: String,
}

impl DeltaRow {
    /// Number of `/` separators in the path.
    pub fn depth(&self) -> usize {
        self.path.matches('/').count()
    }
}

/// Parses `du` output. Blank lines are skipped; a path listed twice keeps its
/// last size.
pub fn parse_du<R: BufRead>(reader: R) -> Result<DuSnapshot, DuError> {
    let mut sizes = HashMap::new();
    for (idx, line) in reader.split(b'\n').enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| DuError::Parse { line: line_no, message: e.to_string() })?;
        let line = trim_ascii_start(&line);
        if line.is_empty() {
            continue;
        }
        let size_end = line.iter().position(u8::is_ascii_whitespace).unwrap_or(line.len());
        let (size, rest) = line.split_at(size_end);
        let path = trim_ascii_start(rest);
        let path = path.strip_suffix(b"\r").unwrap_or(path);
        if path.is_empty() {
            return Err(DuError::Parse { line: line_no, message: "missing path".to_string() });
        }
        let size = std::str::from_utf8(size)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| DuError::Parse {
                line: line_no,
                message: format!("invalid size {:?}", String::from_utf8_lossy(size)),
            })?;
        sizes.insert(path.to_vec(), size);
    }
    Ok(DuSnapshot { sizes })
}

fn trim_ascii_start(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Reads a snapshot file, gunzipping it when the name ends in `.gz`.
pub fn open_snapshot(path: &Path) -> Result<DuSnapshot, DuError> {
    let io_err = |source| DuError::Io { path: path.to_path_buf(), source };
    let file = File::open(path).map_err(io_err)?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    parse_du(BufReader::new(reader)).map_err(|err| match err {
        // Read failures inside the decoder surface per line; attribute them to the file.
        DuError::Parse { line, message } => DuError::Parse { line, message: format!("{}: {}", path.display(), message) },
        other => other,
    })
}

/// Paths whose size changed, smallest delta first (ties by path).
pub fn du_diff(old: &DuSnapshot, new: &DuSnapshot) -> Vec<DeltaRow> {
    let names: HashSet<&Vec<u8>> = old.sizes.keys().chain(new.sizes.keys()).collect();
    let mut rows: Vec<DeltaRow> = names
        .into_iter()
        .filter_map(|name| {
            let before = old.sizes.get(name).copied().unwrap_or(0);
            let after = new.sizes.get(name).copied().unwrap_or(0);
            let delta = after - before;
            (delta != 0).then(|| DeltaRow { delta, path: String::from_utf8_lossy(name).into_owned() })
        })
        .collect();
    rows.sort_by(|a, b| a.delta.cmp(&b.delta).then_with(|| a.path.cmp(&b.path)));
    rows
}

/// Plain-text diff: one `+N<TAB>path` line per row, newline terminated.
pub fn format_du_diff(rows: &[DeltaRow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!("{:+}\t{}", row.delta, row.path));
        out.push('\n');
    }
    if out.is_empty() {
        out.push('\n');
    }
    out
}
