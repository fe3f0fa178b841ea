//! Low-level, truncation-aware read helpers.

use std::io::{ErrorKind, Read};

use super::error::{MetopError, Result};

/// Read exactly `buf.len()` bytes, reporting end-of-file as
/// [`MetopError::TruncatedInput`] with the given context.
///
/// This layer never re-reads from an earlier position, so truncation is
/// always fatal for the caller.
pub fn read_exact(reader: &mut impl Read, buf: &mut [u8], context: &'static str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => MetopError::TruncatedInput { context },
        _ => MetopError::Io(e),
    })
}

/// Read one newline-delimited text line.
///
/// The trailing `\n` is consumed but not returned. Hitting end-of-file
/// before a single byte was read reports `TruncatedInput`; a line that
/// simply lacks a final newline is returned as-is.
pub fn read_line(reader: &mut impl Read, context: &'static str) -> Result<String> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];
    let mut saw_any = false;
    loop {
        match reader.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                saw_any = true;
                if byte[0] == b'\n' {
                    break;
                }
                bytes.push(byte[0]);
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(MetopError::Io(e)),
        }
    }
    if !saw_any {
        return Err(MetopError::TruncatedInput { context });
    }
    // Header text is plain ASCII; anything else is kept lossily so the
    // typed accessors can report it.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
