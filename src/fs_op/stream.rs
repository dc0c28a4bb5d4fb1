//! Byte and text stream primitives.
//!
//! Everything here is synchronous and takes its endpoints by value, so both
//! sides of a transfer are dropped (and closed) on every return path,
//! including early error returns.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use encoding_rs::Encoding;

use crate::fs_op::error::FsOpError;

/// Chunk size used by stream copies unless configured otherwise.
pub const DEFAULT_BUFFER_SIZE: usize = 512 * 1024;
/// Charset label used by the text readers when none is given.
pub const DEFAULT_CHARSET: &str = "UTF-8";
/// Terminator written between lines, whatever the host platform.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Pump `reader` into `writer` in `buffer_size` chunks until EOF.
///
/// Returns the number of bytes copied. The writer is flushed before
/// returning; any read, write or flush failure is reported as
/// [`FsOpError::Stream`].
pub fn stream_copy<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    buffer_size: usize,
) -> Result<u64, FsOpError> {
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut total = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(FsOpError::Stream(e)),
        };
        writer.write_all(&buffer[..read]).map_err(FsOpError::Stream)?;
        total += read as u64;
    }
    writer.flush().map_err(FsOpError::Stream)?;
    Ok(total)
}

fn copy_context(src: &Path, dst: &Path, err: FsOpError) -> FsOpError {
    FsOpError::Copy {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source: Box::new(err),
    }
}

/// Copy the file at `src` to `dst`, creating or truncating `dst`.
pub fn copy_file(src: &Path, dst: &Path, buffer_size: usize) -> Result<u64, FsOpError> {
    let input = File::open(src).map_err(|e| copy_context(src, dst, e.into()))?;
    let output = File::create(dst).map_err(|e| copy_context(src, dst, e.into()))?;
    stream_copy(input, output, buffer_size).map_err(|e| copy_context(src, dst, e))
}

/// Stand-in path for the anonymous end of a stream copy in error context.
const STREAM_END: &str = "<stream>";

/// Stream the file at `src` into an arbitrary writer.
pub fn copy_file_to_writer<W: Write>(
    src: &Path,
    writer: W,
    buffer_size: usize,
) -> Result<u64, FsOpError> {
    let dst = Path::new(STREAM_END);
    let input = File::open(src).map_err(|e| copy_context(src, dst, e.into()))?;
    stream_copy(input, writer, buffer_size).map_err(|e| copy_context(src, dst, e))
}

/// Drain an arbitrary reader into a new (or truncated) file at `dst`.
pub fn copy_reader_to_file<R: Read>(
    reader: R,
    dst: &Path,
    buffer_size: usize,
) -> Result<u64, FsOpError> {
    let src = Path::new(STREAM_END);
    let output = File::create(dst).map_err(|e| copy_context(src, dst, e.into()))?;
    stream_copy(reader, output, buffer_size).map_err(|e| copy_context(src, dst, e))
}

/// Split `text` on `\n`, `\r` or `\r\n`, dropping the terminators.
///
/// A trailing terminator does not produce an empty final line.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Rejoin the lines of `text` with [`LINE_TERMINATOR`].
pub fn canonicalize_line_endings(text: &str) -> String {
    split_lines(text).join(LINE_TERMINATOR)
}

pub(crate) fn lookup_charset(label: &str) -> Result<&'static Encoding, FsOpError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| FsOpError::UnknownCharset(label.to_string()))
}

/// Write `text` line by line through a buffered writer.
///
/// Lines are separated by [`LINE_TERMINATOR`]; nothing follows the last one.
pub fn write_text_to<W: Write>(text: &str, writer: W) -> Result<(), FsOpError> {
    let mut out = BufWriter::new(writer);
    for (i, line) in split_lines(text).into_iter().enumerate() {
        if i > 0 {
            out.write_all(LINE_TERMINATOR.as_bytes())?;
        }
        out.write_all(line.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Write `text` as UTF-8 to `dst`, replacing any previous content.
pub fn write_text(text: &str, dst: &Path) -> Result<(), FsOpError> {
    let file = File::create(dst)?;
    write_text_to(text, file)
}

/// Like [`write_text`] but encodes with the charset named by `charset`.
///
/// Characters the charset cannot represent are written as numeric
/// character references, the way `encoding_rs` encoders do.
pub fn write_text_encoded(text: &str, dst: &Path, charset: &str) -> Result<(), FsOpError> {
    let encoding = lookup_charset(charset)?;
    let canonical = canonicalize_line_endings(text);
    let (bytes, _, had_unmappable) = encoding.encode(&canonical);
    if had_unmappable {
        tracing::warn!(
            "some characters are not representable in {}: {}",
            encoding.name(),
            dst.display()
        );
    }
    let mut out = BufWriter::new(File::create(dst)?);
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(())
}

/// Decode everything `reader` yields with `charset` and split it into lines.
pub fn read_lines_from<R: Read>(mut reader: R, charset: &str) -> Result<Vec<String>, FsOpError> {
    let encoding = lookup_charset(charset)?;
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    let (text, _, had_errors) = encoding.decode(&raw);
    if had_errors {
        tracing::warn!("malformed {} input replaced while decoding", encoding.name());
    }
    Ok(split_lines(&text).into_iter().map(str::to_string).collect())
}

/// Read the file at `src` as UTF-8 lines with terminators stripped.
pub fn read_all_lines(src: &Path) -> Result<Vec<String>, FsOpError> {
    read_all_lines_with(src, DEFAULT_CHARSET)
}

pub fn read_all_lines_with(src: &Path, charset: &str) -> Result<Vec<String>, FsOpError> {
    let file = File::open(src)?;
    read_lines_from(file, charset)
}

/// Read the file at `src` as UTF-8 text with canonical line terminators.
///
/// Whatever terminators the file used, lines come back joined with
/// [`LINE_TERMINATOR`]. An empty file reads as an empty string.
pub fn read_as_text(src: &Path) -> Result<String, FsOpError> {
    read_as_text_with(src, DEFAULT_CHARSET)
}

pub fn read_as_text_with(src: &Path, charset: &str) -> Result<String, FsOpError> {
    Ok(read_all_lines_with(src, charset)?.join(LINE_TERMINATOR))
}

/// Number of line terminators in `src` plus one.
///
/// Works on raw bytes, so the file's encoding is irrelevant as long as it
/// is ASCII-compatible. `\r\n` counts once. An empty file has one line.
pub fn count_lines(src: &Path) -> Result<usize, FsOpError> {
    let mut reader = BufReader::new(File::open(src)?);
    let mut terminators = 0usize;
    let mut after_cr = false;
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        for &b in chunk {
            match b {
                b'\n' if after_cr => after_cr = false,
                b'\n' => terminators += 1,
                b'\r' => {
                    terminators += 1;
                    after_cr = true;
                }
                _ => after_cr = false,
            }
        }
        let len = chunk.len();
        reader.consume(len);
    }
    Ok(terminators + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn stream_copy_preserves_bytes_with_small_buffer() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let mut out = Vec::new();
        let n = stream_copy(&data[..], &mut out, 7).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(out, data);
    }

    #[test]
    fn zero_buffer_size_still_copies() {
        let mut out = Vec::new();
        stream_copy(&b"abc"[..], &mut out, 0).unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn copy_file_releases_both_handles() {
        let td = tempdir().unwrap();
        let src = td.path().join("src.bin");
        let dst = td.path().join("dst.bin");
        fs::write(&src, b"payload").unwrap();

        copy_file(&src, &dst, DEFAULT_BUFFER_SIZE).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"payload");

        // Both ends must be reusable right away.
        fs::OpenOptions::new().append(true).open(&dst).unwrap();
        fs::remove_file(&src).unwrap();
        fs::remove_file(&dst).unwrap();
    }

    #[test]
    fn copy_file_missing_source_has_context() {
        let td = tempdir().unwrap();
        let err = copy_file(&td.path().join("nope"), &td.path().join("out"), 16).unwrap_err();
        assert!(matches!(err, FsOpError::Copy { .. }));
        assert!(!td.path().join("out").exists());
    }

    #[test]
    fn file_to_writer_streams_whole_file() {
        let td = tempdir().unwrap();
        let src = td.path().join("in.bin");
        let data: Vec<u8> = (0..3000u32).map(|i| (i % 199) as u8).collect();
        fs::write(&src, &data).unwrap();

        let mut sink = Vec::new();
        let n = copy_file_to_writer(&src, &mut sink, 64).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(sink, data);
    }

    #[test]
    fn file_to_writer_missing_source_has_context() {
        let td = tempdir().unwrap();
        let mut sink = Vec::new();
        let err = copy_file_to_writer(&td.path().join("nope"), &mut sink, 16).unwrap_err();
        assert!(matches!(err, FsOpError::Copy { ref src, .. } if src.ends_with("nope")));
        assert!(sink.is_empty());
    }

    #[test]
    fn reader_to_file_creates_and_truncates() {
        let td = tempdir().unwrap();
        let dst = td.path().join("out.txt");
        fs::write(&dst, b"much longer previous content").unwrap();

        let n = copy_reader_to_file(&b"fresh"[..], &dst, 2).unwrap();
        assert_eq!(n, 5);
        assert_eq!(fs::read(&dst).unwrap(), b"fresh");
    }

    #[test]
    fn reader_to_file_unwritable_destination_creates_nothing() {
        let td = tempdir().unwrap();
        let dst = td.path().join("no_dir/out.txt");
        let err = copy_reader_to_file(&b"x"[..], &dst, 16).unwrap_err();
        assert!(matches!(err, FsOpError::Copy { ref dst, .. } if dst.ends_with("out.txt")));
        assert!(!td.path().join("no_dir").exists());
    }

    #[test]
    fn split_lines_handles_every_terminator() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn written_text_reads_back_canonicalized() {
        let td = tempdir().unwrap();
        let f = td.path().join("t.txt");
        write_text("a\nb\r\nc", &f).unwrap();
        assert_eq!(fs::read(&f).unwrap(), b"a\r\nb\r\nc");
        assert_eq!(read_as_text(&f).unwrap(), "a\r\nb\r\nc");
        assert_eq!(read_all_lines(&f).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_file_reads_as_empty_text() {
        let td = tempdir().unwrap();
        let f = td.path().join("empty.txt");
        fs::write(&f, b"").unwrap();
        assert_eq!(read_as_text(&f).unwrap(), "");
        assert_eq!(count_lines(&f).unwrap(), 1);
    }

    #[test]
    fn count_lines_counts_terminators_plus_one() {
        let td = tempdir().unwrap();
        let f = td.path().join("c.txt");
        fs::write(&f, b"one\r\ntwo\nthree\rfour").unwrap();
        assert_eq!(count_lines(&f).unwrap(), 4);
        fs::write(&f, b"one\n").unwrap();
        assert_eq!(count_lines(&f).unwrap(), 2);
    }

    #[test]
    fn latin1_round_trip() {
        let td = tempdir().unwrap();
        let f = td.path().join("l1.txt");
        write_text_encoded("café\nthé", &f, "ISO-8859-1").unwrap();
        assert_eq!(fs::read(&f).unwrap(), b"caf\xe9\r\nth\xe9");
        assert_eq!(read_all_lines_with(&f, "latin1").unwrap(), vec!["café", "thé"]);
    }

    #[test]
    fn unknown_charset_is_rejected() {
        let td = tempdir().unwrap();
        let f = td.path().join("x.txt");
        fs::write(&f, b"x").unwrap();
        let err = read_all_lines_with(&f, "klingon-8").unwrap_err();
        assert!(matches!(err, FsOpError::UnknownCharset(l) if l == "klingon-8"));
    }
}
