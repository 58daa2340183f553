//! PDF object types used by the document writer.

use indexmap::IndexMap;

/// Dictionary with insertion-ordered keys, so output is deterministic.
pub type Dict = IndexMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array)
    String(Vec<u8>),
    /// Name (written with a leading /)
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(Dict),
    /// Stream (dictionary + data); `Length` is filled in when written
    Stream {
        /// Stream dictionary
        dict: Dict,
        /// Stream data
        data: bytes::Bytes,
    },
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Name object.
    pub fn name(s: &str) -> Self {
        Object::Name(s.to_string())
    }

    /// Reference to generation 0 of `id`.
    pub fn reference(id: u32) -> Self {
        Object::Reference(ObjectRef::new(id, 0))
    }

    /// Text string for document metadata.
    ///
    /// ASCII text is stored as is; anything else (Urdu titles, for one) is
    /// stored as UTF-16BE with a byte order mark.
    pub fn text(s: &str) -> Self {
        if s.is_ascii() {
            return Object::String(s.as_bytes().to_vec());
        }
        let mut bytes = vec![0xFE, 0xFF];
        for unit in s.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes)
    }

    /// Dictionary from `(key, value)` pairs, in order.
    pub fn dict<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Object)>,
    {
        Object::Dictionary(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    /// Rectangle `[0 0 width height]`.
    pub fn media_box(width: f32, height: f32) -> Self {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(width as f64),
            Object::Real(height as f64),
        ])
    }

    /// Get the type name of this object (without data).
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Stream { .. } => "Stream",
            Object::Reference(_) => "Reference",
        }
    }

    /// Dictionary of a Dictionary or Stream object.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_text_is_literal() {
        assert_eq!(Object::text("Bail"), Object::String(b"Bail".to_vec()));
    }

    #[test]
    fn test_non_ascii_text_is_utf16be() {
        let Object::String(bytes) = Object::text("ع") else {
            panic!("expected string");
        };
        assert_eq!(bytes, vec![0xFE, 0xFF, 0x06, 0x39]);
    }

    #[test]
    fn test_dict_keeps_insertion_order() {
        let obj = Object::dict([("Type", Object::name("Page")), ("Count", Object::Integer(1))]);
        let keys: Vec<_> = obj.as_dict().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["Type", "Count"]);
        assert_eq!(obj.type_name(), "Dictionary");
    }

    #[test]
    fn test_reference_display() {
        assert_eq!(ObjectRef::new(10, 0).to_string(), "10 0 R");
        assert_eq!(Object::reference(3), Object::Reference(ObjectRef::new(3, 0)));
    }
}
