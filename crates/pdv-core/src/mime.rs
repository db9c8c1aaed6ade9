//! Content-based media type detection.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Media type used when content is not recognised.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Media type reported for zero-length files.
pub const EMPTY_MIME_TYPE: &str = "application/x-empty";

/// Number of leading bytes inspected when sniffing.
pub const SNIFF_LEN: u64 = 8192;

/// Infers a media type from the leading bytes of a file.
pub trait MimeSniffer: Send + Sync {
    /// Returns the media type for content starting with `head`.
    fn sniff(&self, head: &[u8]) -> String;
}

/// Magic-number sniffer backed by `infer`, falling back to `text/plain` for
/// UTF-8 text and [`DEFAULT_MIME_TYPE`] for anything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSniffer;

impl MimeSniffer for ContentSniffer {
    fn sniff(&self, head: &[u8]) -> String {
        if head.is_empty() {
            return EMPTY_MIME_TYPE.to_string();
        }
        if let Some(kind) = infer::get(head) {
            return kind.mime_type().to_string();
        }
        if looks_like_text(head) {
            "text/plain".to_string()
        } else {
            DEFAULT_MIME_TYPE.to_string()
        }
    }
}

/// Reads at most [`SNIFF_LEN`] bytes from the start of `path`.
pub(crate) fn read_head(path: &Path) -> io::Result<Vec<u8>> {
    let mut head = Vec::new();
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;
    Ok(head)
}

fn looks_like_text(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // A multi-byte sequence cut off by the sniff window is still text.
        Err(err) => err.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_magic_numbers() {
        let sniffer = ContentSniffer;
        assert_eq!(sniffer.sniff(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n"), "application/pdf");
        assert_eq!(
            sniffer.sniff(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"),
            "image/png"
        );
    }

    #[test]
    fn utf8_without_signature_is_text() {
        assert_eq!(ContentSniffer.sniff("ciao, città".as_bytes()), "text/plain");
    }

    #[test]
    fn truncated_utf8_is_still_text() {
        let bytes = "città".as_bytes();
        assert_eq!(ContentSniffer.sniff(&bytes[..bytes.len() - 1]), "text/plain");
    }

    #[test]
    fn binary_falls_back_to_default() {
        assert_eq!(ContentSniffer.sniff(&[0x00, 0xff, 0x13, 0x37]), DEFAULT_MIME_TYPE);
        assert_eq!(ContentSniffer.sniff(&[0xff, 0xfe, 0xfd]), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn empty_content() {
        assert_eq!(ContentSniffer.sniff(b""), EMPTY_MIME_TYPE);
    }
}
