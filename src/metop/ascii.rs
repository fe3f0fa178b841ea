//! Fixed-line-count ASCII header blocks (MPHR and SPHR).

use std::collections::HashMap;
use std::io::Read;

use log::trace;

use super::error::{MetopError, Result};
use super::stream;

/// Number of key/value lines in a Main Product Header Record.
pub const MPHR_FIELD_COUNT: usize = 72;

/// Number of key/value lines in a Secondary Product Header Record.
pub const SPHR_FIELD_COUNT: usize = 3;

/// An ASCII key/value header block with a fixed line count.
///
/// Each line carries the key in columns 0-29 and the value from column 32
/// onward, both trimmed; columns 30-31 are a fixed separator that is not
/// validated. The format guarantees keys are unique within one block, so
/// a duplicate key silently overwrites (last occurrence wins).
///
/// Built once from a stream, read-only afterward. Parsing the block never
/// fails on non-numeric values; only the typed accessors can.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiHeader {
    map: HashMap<String, String>,
}

impl AsciiHeader {
    /// Read exactly `field_count` lines from the stream.
    pub fn read(reader: &mut impl Read, field_count: usize) -> Result<Self> {
        let mut map = HashMap::with_capacity(field_count);
        for _ in 0..field_count {
            let line = stream::read_line(reader, "ASCII header line")?;
            let (key, value) = split_line(&line);
            trace!("header field {}={}", key, value);
            map.insert(key.to_string(), value.to_string());
        }
        Ok(Self { map })
    }

    /// Look up a raw string value, failing with `MissingKey` if absent.
    pub fn str_value(&self, key: &str) -> Result<&str> {
        self.map
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| MetopError::MissingKey(key.to_string()))
    }

    /// Look up a value and parse it as a 32-bit integer.
    pub fn int_value(&self, key: &str) -> Result<i32> {
        let value = self.str_value(key)?;
        value.parse().map_err(|_| MetopError::FormatError {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Look up a value and parse it as a 64-bit integer.
    pub fn long_value(&self, key: &str) -> Result<i64> {
        let value = self.str_value(key)?;
        value.parse().map_err(|_| MetopError::FormatError {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Render all fields as `KEY=VALUE` lines in lexicographic key order.
    ///
    /// For inspection and debugging only; nothing in parsing depends on
    /// this ordering.
    pub fn dump(&self) -> String {
        let mut keys: Vec<&str> = self.map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys.iter()
            .map(|key| format!("{}={}", key, self.map[*key]))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of distinct keys in the block.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Split one header line into its trimmed key and value columns.
///
/// Lines shorter than the fixed value column yield an empty value rather
/// than failing; genuinely missing data surfaces through the typed
/// accessors instead.
fn split_line(line: &str) -> (&str, &str) {
    let key = line.get(..30).unwrap_or(line).trim();
    let value = line.get(32..).unwrap_or("").trim();
    (key, value)
}
