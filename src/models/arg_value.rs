/// Dynamically typed value of a call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Text.
    String(String),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Absent value.
    Null,
    /// Ordered list of values.
    Sequence(Vec<ArgValue>),
    /// Keyed values.
    Mapping(Vec<(String, ArgValue)>),
    /// Opaque object, identified by its type name.
    Object {
        /// Name of the object's type.
        type_name: String,
    },
    /// Anything else, identified by a runtime type tag such as `resource`.
    Other(String),
}

impl ArgValue {
    /// Opaque object of the given type.
    pub fn object(type_name: impl Into<String>) -> Self {
        ArgValue::Object {
            type_name: type_name.into(),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::String(s.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::String(s)
    }
}

impl From<i64> for ArgValue {
    fn from(i: i64) -> Self {
        ArgValue::Int(i)
    }
}

impl From<i32> for ArgValue {
    fn from(i: i32) -> Self {
        ArgValue::Int(i.into())
    }
}

impl From<u32> for ArgValue {
    fn from(i: u32) -> Self {
        ArgValue::Int(i.into())
    }
}

impl From<f64> for ArgValue {
    fn from(f: f64) -> Self {
        ArgValue::Float(f)
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl<T: Into<ArgValue>> From<Option<T>> for ArgValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ArgValue::Null, Into::into)
    }
}

impl<T: Into<ArgValue>> From<Vec<T>> for ArgValue {
    fn from(values: Vec<T>) -> Self {
        ArgValue::Sequence(values.into_iter().map(Into::into).collect())
    }
}
