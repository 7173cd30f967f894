use indexmap::{map::Entry, IndexMap};
use serde_json::{Map, Value};

/// Headers that never make it into a snapshot.
pub(crate) const EXCLUDED_HEADERS: [&str; 2] = ["Authorization", "Cookie"];

const HEADER_VALUE_SEPARATOR: &str = ", ";

/// Inbound request metadata attached to a report.
///
/// Query parameters and headers keep their insertion order. `Authorization` and `Cookie`
/// headers are refused by [`with_header`](Self::with_header), so a snapshot never carries
/// them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSnapshot {
    /// Absolute request URL.
    pub url: Option<String>,

    /// Request method.
    pub method: Option<String>,

    /// Query string parameters.
    pub query: IndexMap<String, String>,

    /// Body parameters. Values may be nested objects.
    pub body: Map<String, Value>,

    /// Request headers.
    headers: IndexMap<String, String>,
}

impl RequestSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Add a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Add a body parameter.
    pub fn with_body_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(name.into(), value.into());
        self
    }

    /// Replace the body parameters.
    ///
    /// Non-object JSON values are ignored.
    pub fn with_body(mut self, body: Value) -> Self {
        if let Value::Object(body) = body {
            self.body = body;
        }
        self
    }

    /// Add a header. `Authorization` and `Cookie` are dropped. Values of a repeated header are
    /// joined with `, `.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_header(name.into(), value.into());
        self
    }

    /// Headers in insertion order.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    pub(crate) fn insert_header(&mut self, name: String, value: String) {
        if is_excluded_header(&name) {
            return;
        }
        match self.headers.entry(name) {
            Entry::Occupied(mut entry) => {
                let joined = entry.get_mut();
                joined.push_str(HEADER_VALUE_SEPARATOR);
                joined.push_str(&value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }
}

pub(crate) fn is_excluded_header(name: &str) -> bool {
    EXCLUDED_HEADERS
        .iter()
        .any(|excluded| excluded.eq_ignore_ascii_case(name))
}
