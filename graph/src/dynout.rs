//! Splits a subprocess's captured stdout/stderr into lines for status reporting, without
//! pulling in a buffered-reader abstraction: the whole buffer is already in memory by the time
//! a command has finished, so this just walks it once.

/// Splits `buffer` into non-empty lines. Both `\n` and `\r` are line terminators in their own
/// right, each ending the current run and advancing past exactly one byte; `\r\n` therefore
/// ends a line at the `\r` and then immediately closes an empty line at the `\n`, which is
/// discarded along with every other empty line. Trailing partial content with no terminator is
/// still returned as a final line.
pub fn split_lines(buffer: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0usize;

    while start < buffer.len() {
        let mut end = start;
        while end < buffer.len() && buffer[end] != b'\n' && buffer[end] != b'\r' {
            end += 1;
        }
        if end > start {
            lines.push(&buffer[start..end]);
        }
        start = end + 1;
    }

    lines
}
