//! Sort keys extracted from report rows.

use std::cmp::Ordering;

use crate::dom::Document;

/// Name of the data attribute on the first cell holding the raw delta (KiB).
pub const SIZE_ATTRIBUTE: &str = "size";

const DELTA_CELL: usize = 0;
const PATH_CELL: usize = 1;

/// Numeric sort key of a row.
///
/// Rows whose size attribute does not start with an integer carry
/// [`DeltaKey::NOT_A_NUMBER`] and order after every numeric key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeltaKey(Option<i64>);

impl DeltaKey {
    pub const NOT_A_NUMBER: DeltaKey = DeltaKey(None);

    pub fn new(value: i64) -> Self {
        DeltaKey(Some(value))
    }

    /// Integer-prefix parse: leading whitespace, an optional sign and at least
    /// one decimal digit; anything after the digits is ignored
    /// (`"12px"` is 12). Values beyond `i64` saturate.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim_start();
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let digits: &str = {
            let end = digits.bytes().take_while(u8::is_ascii_digit).count();
            &digits[..end]
        };
        if digits.is_empty() {
            return DeltaKey::NOT_A_NUMBER;
        }
        let mut value: i64 = 0;
        for d in digits.bytes() {
            let d = i64::from(d - b'0');
            value = value.saturating_mul(10);
            value = if negative { value.saturating_sub(d) } else { value.saturating_add(d) };
        }
        DeltaKey(Some(value))
    }

    pub fn value(&self) -> Option<i64> {
        self.0
    }

    pub fn is_not_a_number(&self) -> bool {
        self.0.is_none()
    }
}

impl Ord for DeltaKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl PartialOrd for DeltaKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Delta of a row, read from the size attribute of its first cell.
pub fn by_delta<D: Document>(doc: &D, row: &D::Element) -> DeltaKey {
    doc.cell_data(row, DELTA_CELL, SIZE_ATTRIBUTE)
        .map(|raw| DeltaKey::parse(&raw))
        .unwrap_or(DeltaKey::NOT_A_NUMBER)
}

/// Path of a row: the visible text of its second cell, compared ordinally.
///
/// `String` ordering is by code point; a browser comparing UTF-16 code units
/// orders differently only for characters outside the Basic Multilingual Plane.
pub fn by_path<D: Document>(doc: &D, row: &D::Element) -> String {
    doc.cell_text(row, PATH_CELL).unwrap_or_default()
}
