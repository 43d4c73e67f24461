//! Bounded file reads and streaming line counts

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Text prefix of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedText {
    pub text: String,
    pub truncated: bool,
}

/// Read at most `max_bytes` of a file as UTF-8 text.
///
/// A multi-byte character cut by the bound is dropped. Files containing NUL
/// bytes or invalid UTF-8 are rejected with `InvalidData`.
pub fn read_bounded(path: &Path, max_bytes: usize) -> io::Result<BoundedText> {
    let file = File::open(path)?;
    let mut buf = Vec::with_capacity(max_bytes.min(64 * 1024) + 1);
    file.take(max_bytes as u64 + 1).read_to_end(&mut buf)?;

    let truncated = buf.len() > max_bytes;
    buf.truncate(max_bytes);

    if buf.contains(&0) {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "binary content"));
    }

    let text = match String::from_utf8(buf) {
        Ok(text) => text,
        Err(err) => {
            let utf8_error = err.utf8_error();
            // error_len() == None means the input ended mid-character
            if truncated && utf8_error.error_len().is_none() {
                let valid = utf8_error.valid_up_to();
                let mut bytes = err.into_bytes();
                bytes.truncate(valid);
                String::from_utf8(bytes)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
            } else {
                return Err(io::Error::new(io::ErrorKind::InvalidData, utf8_error));
            }
        }
    };

    Ok(BoundedText { text, truncated })
}

/// Count lines of a whole file without keeping it in memory
pub fn count_lines(path: &Path) -> io::Result<usize> {
    let mut file = File::open(path)?;
    let mut chunk = [0u8; 8192];
    let mut lines = 0;
    let mut last = None;

    loop {
        let read = file.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        lines += chunk[..read].iter().filter(|&&b| b == b'\n').count();
        last = Some(chunk[read - 1]);
    }

    // A final line without a trailing newline still counts
    if matches!(last, Some(byte) if byte != b'\n') {
        lines += 1;
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_bounded_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big.txt");
        fs::write(&path, "a".repeat(100)).unwrap();

        let text = read_bounded(&path, 10).unwrap();
        assert_eq!(text.text.len(), 10);
        assert!(text.truncated);

        let text = read_bounded(&path, 100).unwrap();
        assert_eq!(text.text.len(), 100);
        assert!(!text.truncated);
    }

    #[test]
    fn test_read_bounded_drops_split_character() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("utf8.txt");
        // "é" is two bytes; bound falls between them
        fs::write(&path, "abé").unwrap();

        let text = read_bounded(&path, 3).unwrap();
        assert_eq!(text.text, "ab");
        assert!(text.truncated);
    }

    #[test]
    fn test_read_bounded_rejects_binary() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blob.bin");
        fs::write(&path, [0x7f, b'E', b'L', b'F', 0, 0, 1]).unwrap();

        let err = read_bounded(&path, 1024).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_count_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lines.txt");

        fs::write(&path, "one\ntwo\nthree").unwrap();
        assert_eq!(count_lines(&path).unwrap(), 3);

        fs::write(&path, "one\ntwo\n").unwrap();
        assert_eq!(count_lines(&path).unwrap(), 2);

        fs::write(&path, "").unwrap();
        assert_eq!(count_lines(&path).unwrap(), 0);
    }
}
