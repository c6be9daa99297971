use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("document is not valid {encoding}")]
pub struct DecodeError {
    pub encoding: &'static str,
}

/// Encoding of an XML document and the length of its byte order mark.
///
/// A BOM wins, then the byte pattern of `<?` in UTF-16, then the
/// `encoding` pseudo-attribute of the declaration. Anything else is UTF-8.
pub fn sniff_encoding(bytes: &[u8]) -> (&'static Encoding, usize) {
    if let Some(found) = Encoding::for_bom(bytes) {
        return found;
    }
    match bytes {
        [0x3C, 0x00, 0x3F, 0x00, ..] => return (UTF_16LE, 0),
        [0x00, 0x3C, 0x00, 0x3F, ..] => return (UTF_16BE, 0),
        _ => {}
    }
    // An ASCII-readable declaration cannot really be UTF-16.
    let encoding = declared_label(bytes)
        .and_then(Encoding::for_label)
        .map(Encoding::output_encoding)
        .unwrap_or(UTF_8);
    (encoding, 0)
}

pub fn decode_document(bytes: &[u8]) -> Result<String, DecodeError> {
    let (encoding, bom_len) = sniff_encoding(bytes);
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .map(Cow::into_owned)
        .ok_or(DecodeError {
            encoding: encoding.name(),
        })
}

fn declared_label(bytes: &[u8]) -> Option<&[u8]> {
    let head = bytes.strip_prefix(b"<?xml")?;
    let end = head.windows(2).position(|w| w == b"?>")?;
    let decl = &head[..end];
    let at = decl.windows(8).position(|w| w == b"encoding")?;
    let rest = skip_spaces(&decl[at + 8..]).strip_prefix(b"=")?;
    let rest = skip_spaces(rest);
    let quote = *rest.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value = &rest[1..];
    let close = value.iter().position(|&b| b == quote)?;
    Some(&value[..close])
}

fn skip_spaces(bytes: &[u8]) -> &[u8] {
    let n = bytes.iter().take_while(|b| b.is_ascii_whitespace()).count();
    &bytes[n..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn t_enc_001_utf16_with_bom_decodes() {
        let bytes = utf16le_with_bom(r#"<?xml version="1.0" encoding="utf-16"?><Resources/>"#);
        assert_eq!(sniff_encoding(&bytes), (UTF_16LE, 2));
        let text = decode_document(&bytes).expect("decode");
        assert!(text.starts_with("<?xml"));
        assert!(text.ends_with("<Resources/>"));
    }

    #[test]
    fn t_enc_002_utf16_without_bom_is_sniffed() {
        let mut bytes = Vec::new();
        for unit in "<?xml version=\"1.0\"?><Resources/>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(sniff_encoding(&bytes).0, UTF_16BE);
        assert_eq!(
            decode_document(&bytes).expect("decode"),
            "<?xml version=\"1.0\"?><Resources/>"
        );
    }

    #[test]
    fn t_enc_003_declared_single_byte_encoding_is_honoured() {
        let mut bytes = b"<?xml version='1.0' encoding = 'ISO-8859-1'?><Resources>".to_vec();
        bytes.extend_from_slice(&[b'C', b'a', b'f', 0xE9]);
        bytes.extend_from_slice(b"</Resources>");
        let text = decode_document(&bytes).expect("decode");
        assert!(text.contains("Caf\u{e9}"));
    }

    #[test]
    fn t_enc_004_utf8_bom_is_removed_and_bad_bytes_are_rejected() {
        let text = decode_document(b"\xEF\xBB\xBF<Resources/>").expect("decode");
        assert_eq!(text, "<Resources/>");

        let err = decode_document(b"<Resources>\xFF</Resources>").expect_err("invalid utf-8");
        assert_eq!(err.encoding, "UTF-8");
    }
}
