//! Attribute access with fallback and decoding
//!
//! pydevd percent-encodes text attribute values (`urllib.quote`) and writes
//! integers as plain decimal text. Every decoder reads attributes through
//! these helpers so the fallback and decoding rules stay uniform:
//!
//! - text reads percent-decode the raw value; numeric reads do not
//! - a fallback applies only when the attribute is absent, never when it is
//!   present but malformed

use crate::error::{Error, Result};
use crate::reader::TreeReader;
use std::str::FromStr;

/// Fail with [`Error::UnexpectedNode`] unless the cursor sits on `expected`.
pub fn expect_node<R: TreeReader + ?Sized>(reader: &R, expected: &str) -> Result<()> {
    if reader.node_name() != expected {
        return Err(Error::unexpected(&[expected], reader.node_name()));
    }
    Ok(())
}

fn read_raw<'r, R: TreeReader + ?Sized>(reader: &'r R, name: &str) -> Result<&'r str> {
    reader.attribute(name).ok_or_else(|| Error::MissingAttribute {
        name: name.to_string(),
    })
}

/// Read and percent-decode a required text attribute.
pub fn read_required<R: TreeReader + ?Sized>(reader: &R, name: &str) -> Result<String> {
    percent_decode(read_raw(reader, name)?)
}

/// Read and percent-decode a text attribute, or return `fallback` if absent.
pub fn read_optional<R: TreeReader + ?Sized>(
    reader: &R,
    name: &str,
    fallback: &str,
) -> Result<String> {
    match reader.attribute(name) {
        Some(raw) => percent_decode(raw),
        None => Ok(fallback.to_string()),
    }
}

/// Read a required integer attribute.
pub fn read_required_int<R: TreeReader + ?Sized>(reader: &R, name: &str) -> Result<i32> {
    parse_number(name, read_raw(reader, name)?)
}

/// Read an integer attribute, or return `fallback` if absent.
pub fn read_optional_int<R: TreeReader + ?Sized>(
    reader: &R,
    name: &str,
    fallback: i32,
) -> Result<i32> {
    match reader.attribute(name) {
        Some(raw) => parse_number(name, raw),
        None => Ok(fallback),
    }
}

/// Parse decimal text, reporting the attribute it came from on failure.
pub fn parse_number<T: FromStr>(attribute: &str, text: &str) -> Result<T> {
    text.parse().map_err(|_| Error::MalformedNumber {
        attribute: attribute.to_string(),
        value: text.to_string(),
    })
}

/// Decode `application/x-www-form-urlencoded` text as UTF-8.
///
/// `+` becomes a space. Unlike a lenient decoder, a `%` that is not followed
/// by two hex digits is an error rather than literal text.
pub fn percent_decode(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            let valid = escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(Error::Encoding {
                    raw: raw.to_string(),
                    reason: format!("incomplete escape sequence at byte {}", i),
                });
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| Error::Encoding {
            raw: raw.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::XmlTreeReader;

    fn node(xml: &str) -> XmlTreeReader {
        XmlTreeReader::parse(xml).unwrap()
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("plain").unwrap(), "plain");
        assert_eq!(percent_decode("a%20b+c").unwrap(), "a b c");
        assert_eq!(percent_decode("1%2B1").unwrap(), "1+1");
        assert_eq!(percent_decode("%3Cmodule%3E").unwrap(), "<module>");
        assert_eq!(percent_decode("caf%C3%A9").unwrap(), "café");
        assert_eq!(percent_decode("").unwrap(), "");
    }

    #[test]
    fn test_percent_decode_rejects_malformed_escapes() {
        for raw in ["%", "%4", "abc%G1", "%%41"] {
            match percent_decode(raw) {
                Err(Error::Encoding { raw: r, .. }) => assert_eq!(r, raw),
                other => panic!("expected encoding error for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_percent_decode_rejects_invalid_utf8() {
        assert!(matches!(
            percent_decode("%C3%28"),
            Err(Error::Encoding { .. })
        ));
    }

    #[test]
    fn test_required_and_optional_text() {
        let reader = node(r#"<frame name="my%20func" file=""/>"#);

        assert_eq!(read_required(&reader, "name").unwrap(), "my func");
        assert_eq!(read_required(&reader, "file").unwrap(), "");
        assert!(matches!(
            read_required(&reader, "id"),
            Err(Error::MissingAttribute { name }) if name == "id"
        ));

        assert_eq!(read_optional(&reader, "id", "fallback").unwrap(), "fallback");
        // present-but-empty is not absent
        assert_eq!(read_optional(&reader, "file", "fallback").unwrap(), "");
    }

    #[test]
    fn test_optional_text_surfaces_encoding_error() {
        let reader = node(r#"<var value="100%"/>"#);
        assert!(matches!(
            read_optional(&reader, "value", ""),
            Err(Error::Encoding { .. })
        ));
    }

    #[test]
    fn test_integers() {
        let reader = node(r#"<thread stop_reason="111" line="-3" bad="1x"/>"#);

        assert_eq!(read_optional_int(&reader, "stop_reason", 0).unwrap(), 111);
        assert_eq!(read_required_int(&reader, "line").unwrap(), -3);
        assert_eq!(read_optional_int(&reader, "missing", 7).unwrap(), 7);
        assert!(matches!(
            read_optional_int(&reader, "bad", 0),
            Err(Error::MalformedNumber { attribute, value }) if attribute == "bad" && value == "1x"
        ));
        assert!(matches!(
            read_required_int(&reader, "missing"),
            Err(Error::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_expect_node() {
        let reader = node("<arg/>");
        assert!(expect_node(&reader, "arg").is_ok());
        assert!(matches!(
            expect_node(&reader, "var"),
            Err(Error::UnexpectedNode { expected, found }) if expected == ["var"] && found == "arg"
        ));
    }
}
