//! PDF object serialization.
//!
//! Writes [`Object`]s in PDF syntax into a byte buffer. Writing into a `Vec`
//! cannot fail, so none of these methods return errors.

use crate::object::{Dict, Object};

/// Serializer for PDF objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer {
    /// Put each dictionary entry on its own line
    pretty: bool,
}

impl ObjectSerializer {
    /// Compact serializer (single spaces between tokens).
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializer that breaks dictionaries over lines.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Serialize an object to bytes.
    pub fn serialize(&self, obj: &Object) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj);
        buf
    }

    /// Serialize an object to a string (for debugging).
    pub fn serialize_to_string(&self, obj: &Object) -> String {
        String::from_utf8_lossy(&self.serialize(obj)).into_owned()
    }

    /// Append an indirect object definition: `{id} 0 obj ... endobj`.
    pub fn write_indirect(&self, out: &mut Vec<u8>, id: u32, obj: &Object) {
        out.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
        self.write_object(out, obj);
        out.extend_from_slice(b"\nendobj\n");
    }

    /// Append one object.
    pub fn write_object(&self, out: &mut Vec<u8>, obj: &Object) {
        match obj {
            Object::Null => out.extend_from_slice(b"null"),
            Object::Integer(i) => out.extend_from_slice(i.to_string().as_bytes()),
            Object::Real(r) => write_real(out, *r),
            Object::String(s) => write_string(out, s),
            Object::Name(n) => write_name(out, n),
            Object::Array(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    self.write_object(out, item);
                }
                out.push(b']');
            },
            Object::Dictionary(dict) => self.write_dictionary(out, dict, None),
            Object::Stream { dict, data } => {
                self.write_dictionary(out, dict, Some(data.len()));
                out.extend_from_slice(b"\nstream\n");
                out.extend_from_slice(data);
                out.extend_from_slice(b"\nendstream");
            },
            Object::Reference(r) => out.extend_from_slice(r.to_string().as_bytes()),
        }
    }

    /// `length` overrides any `Length` entry; streams always know their size.
    fn write_dictionary(&self, out: &mut Vec<u8>, dict: &Dict, length: Option<usize>) {
        let separator: &[u8] = if self.pretty { b"\n  " } else { b" " };
        out.extend_from_slice(b"<<");

        let entries = dict.iter().filter(|(key, _)| length.is_none() || key.as_str() != "Length");
        for (key, value) in entries {
            out.extend_from_slice(separator);
            write_name(out, key);
            out.push(b' ');
            self.write_object(out, value);
        }
        if let Some(length) = length {
            out.extend_from_slice(separator);
            out.extend_from_slice(format!("/Length {}", length).as_bytes());
        }

        if self.pretty {
            out.push(b'\n');
        } else {
            out.push(b' ');
        }
        out.extend_from_slice(b">>");
    }
}

/// Reals with at most five decimals, trailing zeros trimmed.
fn write_real(out: &mut Vec<u8>, value: f64) {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        out.extend_from_slice((value as i64).to_string().as_bytes());
    } else {
        let formatted = format!("{:.5}", value);
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        out.extend_from_slice(trimmed.as_bytes());
    }
}

/// Literal `( ... )` for printable ASCII, hex `< ... >` otherwise.
fn write_string(out: &mut Vec<u8>, data: &[u8]) {
    let printable = data.iter().all(|&b| (0x20..=0x7E).contains(&b));
    if printable {
        out.push(b'(');
        for &byte in data {
            if matches!(byte, b'(' | b')' | b'\\') {
                out.push(b'\\');
            }
            out.push(byte);
        }
        out.push(b')');
    } else {
        out.push(b'<');
        for byte in data {
            out.extend_from_slice(format!("{:02X}", byte).as_bytes());
        }
        out.push(b'>');
    }
}

/// Names escape delimiters, whitespace and non-ASCII bytes as `#xx`.
fn write_name(out: &mut Vec<u8>, name: &str) {
    out.push(b'/');
    for byte in name.bytes() {
        let regular = (0x21..=0x7E).contains(&byte)
            && !matches!(byte, b'#' | b'/' | b'%' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}');
        if regular {
            out.push(byte);
        } else {
            out.extend_from_slice(format!("#{:02X}", byte).as_bytes());
        }
    }
}
