//! Loading the compacted document: binary sniffing, encoding detection and line splitting.

use std::fmt;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;
use tracing::debug;

use crate::error::SplitError;

/// Bytes inspected for a NUL when deciding whether the input is binary.
pub const BINARY_SNIFF_LEN: usize = 1024;

/// Encodings tried when none is forced, in order.
pub const DETECTION_ORDER: [TextEncoding; 4] =
    [TextEncoding::Utf8, TextEncoding::Latin1, TextEncoding::Cp1252, TextEncoding::Utf16];

#[derive(ValueEnum, Serialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    #[value(name = "utf-8", alias = "utf8")]
    #[serde(rename = "utf-8")]
    Utf8,
    /// ISO-8859-1. Every byte maps to a character, so this never fails.
    #[value(name = "latin-1", alias = "latin1")]
    #[serde(rename = "latin-1")]
    Latin1,
    #[value(name = "cp1252", alias = "windows-1252")]
    #[serde(rename = "cp1252")]
    Cp1252,
    /// Byte order taken from the BOM, little endian without one.
    #[value(name = "utf-16", alias = "utf16")]
    #[serde(rename = "utf-16")]
    Utf16,
}

impl TextEncoding {
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Cp1252 => "cp1252",
            TextEncoding::Utf16 => "utf-16",
        }
    }

    /// Decodes `bytes` strictly; `None` if they are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(str::to_owned)
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Cp1252 => encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|cow| cow.into_owned()),
            TextEncoding::Utf16 => {
                let (encoding, body) = match bytes {
                    [0xFF, 0xFE, rest @ ..] => (encoding_rs::UTF_16LE, rest),
                    [0xFE, 0xFF, rest @ ..] => (encoding_rs::UTF_16BE, rest),
                    _ => (encoding_rs::UTF_16LE, bytes),
                };
                if body.len() % 2 != 0 {
                    return None;
                }
                encoding
                    .decode_without_bom_handling_and_without_replacement(body)
                    .map(|cow| cow.into_owned())
            }
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded input document.
#[derive(Debug, Clone)]
pub struct Document {
    pub encoding: TextEncoding,
    pub lines: Vec<String>,
}

impl Document {
    /// Splits decoded text into lines without their terminators.
    pub fn from_text(text: &str, encoding: TextEncoding) -> Self {
        Self { encoding, lines: split_lines(text) }
    }
}

/// Splits on `\r\n`, lone `\r` or `\n`. A terminator at the very end does not start a new line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(pos) => {
                lines.push(rest[..pos].to_owned());
                let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + skip..];
            }
            None => {
                lines.push(rest.to_owned());
                break;
            }
        }
    }
    lines
}

/// Whether the sniffed prefix of `bytes` contains a NUL byte.
pub fn looks_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
}

/// Picks the first encoding in [`DETECTION_ORDER`] that decodes `bytes`.
pub fn detect_and_decode(bytes: &[u8]) -> Option<(TextEncoding, String)> {
    DETECTION_ORDER
        .into_iter()
        .find_map(|enc| enc.decode(bytes).map(|text| (enc, text)))
}

/// Reads and decodes the document at `path`.
///
/// With `forced` set, only that encoding is tried.
pub fn read_document(path: &Path, forced: Option<TextEncoding>) -> Result<Document, SplitError> {
    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SplitError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(SplitError::io(e, path)),
    };
    if !meta.is_file() {
        return Err(SplitError::NotAFile(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|e| SplitError::io(e, path))?;
    if looks_binary(&bytes) {
        return Err(SplitError::Binary(path.to_path_buf()));
    }

    let (encoding, text) = match forced {
        Some(enc) => {
            let text = enc.decode(&bytes).ok_or_else(|| SplitError::WrongEncoding {
                path: path.to_path_buf(),
                encoding: enc.name(),
            })?;
            (enc, text)
        }
        None => detect_and_decode(&bytes)
            .ok_or_else(|| SplitError::Undecodable { path: path.to_path_buf() })?,
    };
    debug!("Decoded {} ({} bytes) as {}", path.display(), bytes.len(), encoding);

    Ok(Document::from_text(&text, encoding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::fsx::MemoryFs;
    use tempfile::tempdir;

    #[test]
    fn utf8_is_preferred() {
        let (enc, text) = detect_and_decode("héllo".as_bytes()).unwrap();
        assert_eq!(enc, TextEncoding::Utf8);
        assert_eq!(text, "héllo");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        let (enc, text) = detect_and_decode(b"caf\xe9").unwrap();
        assert_eq!(enc, TextEncoding::Latin1);
        assert_eq!(text, "café");
    }

    #[test]
    fn cp1252_maps_smart_quotes() {
        assert_eq!(TextEncoding::Cp1252.decode(b"\x93hi\x94").unwrap(), "\u{201c}hi\u{201d}");
    }

    #[test]
    fn utf16_with_bom() {
        let le = [0xFF, 0xFE, b'h', 0, b'i', 0];
        let be = [0xFE, 0xFF, 0, b'h', 0, b'i'];
        assert_eq!(TextEncoding::Utf16.decode(&le).unwrap(), "hi");
        assert_eq!(TextEncoding::Utf16.decode(&be).unwrap(), "hi");
        assert!(TextEncoding::Utf16.decode(&[0xFF, 0xFE, b'h']).is_none());
    }

    #[test]
    fn utf8_bom_is_dropped() {
        assert_eq!(TextEncoding::Utf8.decode(b"\xEF\xBB\xBFabc").unwrap(), "abc");
    }

    #[test]
    fn binary_sniff_only_checks_prefix() {
        assert!(looks_binary(b"abc\0def"));
        let mut late_nul = vec![b'a'; BINARY_SNIFF_LEN];
        late_nul.push(0);
        assert!(!looks_binary(&late_nul));
    }

    #[test]
    fn lines_lose_terminators() {
        let doc = Document::from_text("a\r\nb\n\nc", TextEncoding::Utf8);
        assert_eq!(doc.lines, vec!["a", "b", "", "c"]);
    }

    #[test]
    fn lone_carriage_return_ends_a_line() {
        assert_eq!(split_lines("a\rb\r\rc\r"), vec!["a", "b", "", "c"]);
        assert_eq!(split_lines("a\r\r\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn classic_mac_document_extracts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mac.md");
        fs::write(&path, "```py\r# File: mac.py\rx = 1\r```\r").unwrap();

        let doc = read_document(&path, None).unwrap();
        assert_eq!(doc.lines, vec!["```py", "# File: mac.py", "x = 1", "```"]);

        let mut mem = MemoryFs::new();
        let r = extract(&doc.lines, &mut mem);
        assert_eq!(r.successful, 1);
        assert_eq!(mem.read("mac.py"), Some("# File: mac.py\nx = 1\n"));
    }

    #[test]
    fn doubled_carriage_return_leaves_no_stray_cr() {
        let doc = Document::from_text("```py\r\n# File: a.py\r\nx = 1\r\r\n```\r\n", TextEncoding::Utf8);
        let mut mem = MemoryFs::new();
        extract(&doc.lines, &mut mem);
        assert_eq!(mem.read("a.py"), Some("# File: a.py\nx = 1\n"));
    }

    #[test]
    fn read_document_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.md");
        assert!(matches!(read_document(&missing, None), Err(SplitError::NotFound(_))));
        assert!(matches!(read_document(dir.path(), None), Err(SplitError::NotAFile(_))));

        let bin = dir.path().join("bin.md");
        fs::write(&bin, b"```py\0").unwrap();
        assert!(matches!(read_document(&bin, None), Err(SplitError::Binary(_))));
    }

    #[test]
    fn forced_encoding_must_decode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.md");
        fs::write(&path, b"caf\xe9\n").unwrap();

        let err = read_document(&path, Some(TextEncoding::Utf8)).unwrap_err();
        assert!(matches!(err, SplitError::WrongEncoding { encoding: "utf-8", .. }));

        let doc = read_document(&path, Some(TextEncoding::Cp1252)).unwrap();
        assert_eq!(doc.encoding, TextEncoding::Cp1252);
        assert_eq!(doc.lines, vec!["café"]);
    }

    #[test]
    fn read_document_detects_encoding() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "```py\n# File: a.py\n```\n").unwrap();
        let doc = read_document(&path, None).unwrap();
        assert_eq!(doc.encoding, TextEncoding::Utf8);
        assert_eq!(doc.lines.len(), 3);
    }
}
