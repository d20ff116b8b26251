//! Structured key/value fields
//!
//! This module provides:
//! - `FieldValue`: a typed value and its logfmt rendering
//! - `Field`: one key/value pair
//! - `Fields`: an ordered list of pairs (insertion order is preserved)

use super::escape;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::io::Write;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    F64(f64),
    Str(String),
    F32(f32),
    Bytes(Vec<u8>),
    /// Message text of an error
    Error(String),
    /// Output of a `Display` or `Debug` implementation
    Display(String),
}

impl FieldValue {
    /// Capture the message of an error.
    pub fn error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        FieldValue::Error(err.to_string())
    }

    /// Capture a value through its `Display` implementation.
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        FieldValue::Display(value.to_string())
    }

    /// Generic fallback for values with only a `Debug` implementation.
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        FieldValue::Display(format!("{:?}", value))
    }

    /// Render the value as unescaped text.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Str(s) | FieldValue::Error(s) | FieldValue::Display(s) => Cow::Borrowed(s),
            FieldValue::Bytes(b) => String::from_utf8_lossy(b),
            other => {
                let mut buf = Vec::new();
                other.write_raw(&mut buf);
                Cow::Owned(String::from_utf8_lossy(&buf).into_owned())
            }
        }
    }

    /// Append the logfmt form of the value (rendered, then escaped) to `buf`.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        match self {
            FieldValue::Str(s) | FieldValue::Error(s) | FieldValue::Display(s) => {
                escape::write_escaped(buf, s.as_bytes())
            }
            FieldValue::Bytes(b) => escape::write_escaped(buf, b),
            other => other.write_raw(buf),
        }
    }

    /// Non-textual values are written without escaping.
    fn write_raw(&self, buf: &mut Vec<u8>) {
        // Writes into a Vec cannot fail.
        let _ = match self {
            FieldValue::Null => buf.write_all(b"null"),
            FieldValue::Bool(b) => write!(buf, "{}", b),
            FieldValue::Int(i) => write!(buf, "{}", i),
            FieldValue::Uint(u) => write!(buf, "{}", u),
            FieldValue::F32(f) => write!(buf, "{}", f),
            FieldValue::F64(f) => write!(buf, "{}", f),
            FieldValue::Str(s) | FieldValue::Error(s) | FieldValue::Display(s) => {
                buf.write_all(s.as_bytes())
            }
            FieldValue::Bytes(b) => buf.write_all(b),
        };
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::Str(s.clone())
    }
}

impl From<Cow<'_, str>> for FieldValue {
    fn from(s: Cow<'_, str>) -> Self {
        FieldValue::Str(s.into_owned())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(b: Vec<u8>) -> Self {
        FieldValue::Bytes(b)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(b: &[u8]) -> Self {
        FieldValue::Bytes(b.to_vec())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty: $($ty:ty),+) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    FieldValue::$variant(v as $target)
                }
            }
        )+
    };
}

impl_from_int!(Int, i64: i8, i16, i32, i64, isize);
impl_from_int!(Uint, u64: u8, u16, u32, u64, usize);

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::F32(f)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::F64(f)
    }
}

impl From<char> for FieldValue {
    fn from(c: char) -> Self {
        FieldValue::Str(c.to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl From<std::io::Error> for FieldValue {
    fn from(err: std::io::Error) -> Self {
        FieldValue::error(&err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for FieldValue {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        FieldValue::Error(err.to_string())
    }
}

/// One key/value pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered list of fields
///
/// Pairs keep the order they were added in; duplicate keys are allowed and
/// emitted as given. Pairs with an empty key are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    items: Vec<Field>,
}

impl Fields {
    /// Create a new empty field list
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build fields from a flattened `key, value, key, value, ...` list.
    ///
    /// Keys are rendered to text. A trailing key without a value is dropped.
    pub fn from_flat<I>(flat: I) -> Self
    where
        I: IntoIterator<Item = FieldValue>,
    {
        let mut fields = Self::new();
        let mut iter = flat.into_iter();
        while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
            fields.push(key.render().into_owned(), value);
        }
        fields
    }

    /// Add a field
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.push(key, value);
        self
    }

    /// Add a field (mutable version)
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let key = key.into();
        if key.is_empty() {
            return;
        }
        self.items.push(Field {
            key,
            value: value.into(),
        });
    }

    /// Append all fields of `other`, after the existing ones.
    pub fn extend_from(&mut self, other: &Fields) {
        self.items.extend(other.items.iter().cloned());
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.items.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Field] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Field> for Fields {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for field in iter {
            fields.push(field.key, field.value);
        }
        fields
    }
}

impl<K, V> From<Vec<(K, V)>> for Fields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().map(|(k, v)| Field::new(k, v)).collect()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        for (idx, field) in self.items.iter().enumerate() {
            if idx > 0 {
                buf.push(b' ');
            }
            escape::write_escaped(&mut buf, field.key.as_bytes());
            buf.push(b'=');
            field.value.write_to(&mut buf);
        }
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logfmt(value: impl Into<FieldValue>) -> String {
        let mut buf = Vec::new();
        value.into().write_to(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(logfmt(true), "true");
        assert_eq!(logfmt(1i8), "1");
        assert_eq!(logfmt(-42i64), "-42");
        assert_eq!(logfmt(7u32), "7");
        assert_eq!(logfmt(FieldValue::Null), "null");
        assert_eq!(logfmt(None::<i32>), "null");
    }

    #[test]
    fn test_float_rendering() {
        assert_eq!(logfmt(1.0f64), "1");
        assert_eq!(logfmt(1.0f32), "1");
        assert_eq!(logfmt(1.025f64), "1.025");
        assert_eq!(logfmt(1e-3f64), "0.001");
        assert_eq!(logfmt(1e21f64), "1000000000000000000000");
        assert_eq!(logfmt(0.1f32), "0.1");
    }

    #[test]
    fn test_text_values_are_escaped() {
        assert_eq!(logfmt("v v"), r#""v v""#);
        assert_eq!(logfmt("null"), r#""null""#);
        assert_eq!(logfmt(b"\xbd".to_vec()), r#""\ufffd""#);

        let err = std::io::Error::new(std::io::ErrorKind::Other, "this is a fake error");
        assert_eq!(logfmt(err), r#""this is a fake error""#);
    }

    #[test]
    fn test_display_and_debug_fallbacks() {
        #[derive(Debug)]
        struct Foo {
            a: i32,
        }

        assert_eq!(logfmt(FieldValue::debug(&Foo { a: 1 })), r#""Foo { a: 1 }""#);
        assert_eq!(logfmt(FieldValue::display(&std::net::Ipv4Addr::LOCALHOST)), "127.0.0.1");
    }

    #[test]
    fn test_render_is_unescaped() {
        assert_eq!(FieldValue::from("a b").render(), "a b");
        assert_eq!(FieldValue::from(3.5f64).render(), "3.5");
        assert_eq!(FieldValue::from(b"hi".to_vec()).render(), "hi");
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let fields = Fields::new()
            .with_field("zeta", 1)
            .with_field("alpha", "a")
            .with_field("mid", true);

        let keys: Vec<_> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(fields.to_string(), "zeta=1 alpha=a mid=true");
    }

    #[test]
    fn test_from_flat_drops_trailing_key() {
        let fields = Fields::from_flat(vec![
            FieldValue::from("key1"),
            FieldValue::from("val1"),
            FieldValue::from("key2"),
        ]);

        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("key1"), Some(&FieldValue::from("val1")));
        assert!(fields.get("key2").is_none());
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let fields = Fields::new().with_field("", "x").with_field("k", "v");
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_untagged_deserialize() {
        let value: FieldValue = serde_json::from_str("42").unwrap();
        assert_eq!(value, FieldValue::Int(42));
        let value: FieldValue = serde_json::from_str("\"api\"").unwrap();
        assert_eq!(value, FieldValue::Str("api".to_string()));
        let value: FieldValue = serde_json::from_str("null").unwrap();
        assert_eq!(value, FieldValue::Null);
        let value: FieldValue = serde_json::from_str("2.5").unwrap();
        assert_eq!(value, FieldValue::F64(2.5));
    }
}
