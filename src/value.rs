use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An attribute set: attribute name to value.
pub type Fields = BTreeMap<String, Value>;

/// A structured value that is handed to `serde_json` as-is.
///
/// Implemented for every `Serialize + Debug` type; build one with
/// [`Value::any`].
pub trait ToJson: fmt::Debug + Send + Sync {
    /// Append the compact JSON form of `self` to `out`.
    fn to_json(&self, out: &mut Vec<u8>) -> serde_json::Result<()>;
}

impl<T> ToJson for T
where
    T: Serialize + fmt::Debug + Send + Sync,
{
    fn to_json(&self, out: &mut Vec<u8>) -> serde_json::Result<()> {
        serde_json::to_writer(out, self)
    }
}

/// The value of one attribute.
///
/// Primitive variants are rendered by hand; `Any` defers to `serde_json`.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Time(DateTime<Utc>),
    Any(Arc<dyn ToJson>),
}

impl Value {
    /// Capture any serializable value.
    pub fn any<T>(value: T) -> Value
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        Value::Any(Arc::new(value))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(v) => fmt::Debug::fmt(v, f),
            Value::I64(v) => fmt::Debug::fmt(v, f),
            Value::U64(v) => fmt::Debug::fmt(v, f),
            Value::F32(v) => fmt::Debug::fmt(v, f),
            Value::F64(v) => fmt::Debug::fmt(v, f),
            Value::Str(v) => fmt::Debug::fmt(v, f),
            Value::Time(v) => fmt::Debug::fmt(v, f),
            Value::Any(v) => fmt::Debug::fmt(v, f),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident as $as:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v as $as)
                }
            }
        )*
    };
}

impl_from! {
    i8 => I64 as i64,
    i16 => I64 as i64,
    i32 => I64 as i64,
    i64 => I64 as i64,
    isize => I64 as i64,
    u8 => U64 as u64,
    u16 => U64 as u64,
    u32 => U64 as u64,
    u64 => U64 as u64,
    usize => U64 as u64,
    f32 => F32 as f32,
    f64 => F64 as f64,
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<'a> From<Cow<'a, str>> for Value {
    fn from(v: Cow<'a, str>) -> Self {
        Value::Str(v.into_owned())
    }
}

/// Raw bytes are treated as text; invalid UTF-8 becomes U+FFFD.
impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Str(String::from_utf8_lossy(v).into_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        match String::from_utf8(v) {
            Ok(s) => Value::Str(s),
            Err(e) => Value::Str(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        }
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Any(Arc::new(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Build a [`Fields`] set.
///
/// ```
/// let fields = ctxlog::fields! { "user_id" => 42, "reason" => "invalid password" };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::value::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::value::Fields::new();
        $(
            fields.insert(::std::string::String::from($key), $crate::value::Value::from($value));
        )+
        fields
    }};
}
