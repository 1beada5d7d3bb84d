use std::io::{self, Read, Write};

use crate::traits::progress::Progress;

/// Read into `buf`, retrying reads interrupted by a signal.
pub(crate) fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

/// How many bytes to request next: never more than the buffer, never more
/// than what is left of the current fragment.
pub(crate) fn window(buffer_len: usize, remaining: u64) -> usize {
    usize::try_from(remaining).map_or(buffer_len, |r| r.min(buffer_len))
}

/// Copy `reader` into `writer` until EOF through the caller's buffer.
pub(crate) fn copy_through<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut [u8],
    progress: &dyn Progress,
) -> io::Result<u64> {
    let mut copied = 0u64;
    loop {
        let read = read_some(reader, buffer)?;
        if read == 0 {
            return Ok(copied);
        }
        writer.write_all(&buffer[..read])?;
        copied += read as u64;
        progress.advance(read as u64);
    }
}
