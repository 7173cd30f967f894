//! Collect [`RequestSnapshot`]s from the request being served.
//!
//! Every collector drops `Authorization` and `Cookie` headers.

use crate::{convert::to_header_case, models::RequestSnapshot};
use http::{header::HOST, Request};
use serde_json::{Map, Value};
use std::collections::HashMap;

const DEFAULT_SCHEME: &str = "http";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PATH: &str = "/";
const DEFAULT_METHOD: &str = "GET";

/// CGI variables carrying request headers start with this prefix.
const CGI_HEADER_PREFIX: &str = "HTTP_";

const CGI_GATEWAY_INTERFACE: &str = "GATEWAY_INTERFACE";
const CGI_REQUEST_SCHEME: &str = "REQUEST_SCHEME";
const CGI_HTTP_HOST: &str = "HTTP_HOST";
const CGI_REQUEST_URI: &str = "REQUEST_URI";
const CGI_REQUEST_METHOD: &str = "REQUEST_METHOD";
const CGI_QUERY_STRING: &str = "QUERY_STRING";

/// Snapshot of an [`http::Request`].
///
/// The body is not read from the request. Pass the already decoded body parameters instead.
///
/// ```
/// use exception_markdown::collect;
///
/// let request = http::Request::post("/login?next=%2Fhome")
///     .header("Host", "example.com")
///     .header("Cookie", "session=abc")
///     .body(())
///     .unwrap();
/// let snapshot = collect::from_request(&request, Default::default());
/// assert_eq!(Some("http://example.com/login?next=%2Fhome"), snapshot.url.as_deref());
/// assert_eq!(Some("POST"), snapshot.method.as_deref());
/// assert_eq!("/home", snapshot.query["next"]);
/// assert!(snapshot.headers().get("Cookie").is_none());
/// ```
pub fn from_request<B>(request: &Request<B>, body: Map<String, Value>) -> RequestSnapshot {
    let uri = request.uri();
    let host = uri
        .authority()
        .map(|authority| authority.as_str().to_owned())
        .or_else(|| {
            request
                .headers()
                .get(HOST)
                .map(|host| String::from_utf8_lossy(host.as_bytes()).into_owned())
        });
    let path_and_query = uri.path_and_query().map(|p| p.as_str());

    let mut snapshot = RequestSnapshot::new()
        .with_url(build_url(
            uri.scheme_str(),
            host.as_deref(),
            path_and_query,
        ))
        .with_method(request.method().as_str());
    snapshot.query = parse_query(uri.query());
    snapshot.body = body;
    for (name, value) in request.headers() {
        snapshot.insert_header(
            to_header_case(name.as_str()),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }
    snapshot
}

/// Snapshot of a request described by CGI-style variables.
///
/// Returns `None` outside of a request, i.e. when neither `GATEWAY_INTERFACE` nor
/// `REQUEST_METHOD` is set. Headers are taken from the `HTTP_` variables, e.g. `HTTP_USER_AGENT`
/// becomes `User-Agent`.
pub fn from_cgi_vars<I, K, V>(vars: I, body: Map<String, Value>) -> Option<RequestSnapshot>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let vars: Vec<(String, String)> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    let lookup: HashMap<&str, &str> = vars
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    if !lookup.contains_key(CGI_GATEWAY_INTERFACE) && !lookup.contains_key(CGI_REQUEST_METHOD) {
        return None;
    }

    let mut snapshot = RequestSnapshot::new()
        .with_url(build_url(
            lookup.get(CGI_REQUEST_SCHEME).copied(),
            lookup.get(CGI_HTTP_HOST).copied(),
            lookup.get(CGI_REQUEST_URI).copied(),
        ))
        .with_method(
            lookup
                .get(CGI_REQUEST_METHOD)
                .copied()
                .unwrap_or(DEFAULT_METHOD),
        );
    snapshot.query = parse_query(lookup.get(CGI_QUERY_STRING).copied());
    snapshot.body = body;
    for (key, value) in &vars {
        if let Some(name) = key.strip_prefix(CGI_HEADER_PREFIX) {
            snapshot.insert_header(to_header_case(name), value.clone());
        }
    }
    Some(snapshot)
}

/// [`from_cgi_vars`] over the variables of the current process.
pub fn from_process_env(body: Map<String, Value>) -> Option<RequestSnapshot> {
    from_cgi_vars(std::env::vars(), body)
}

fn build_url(scheme: Option<&str>, host: Option<&str>, path_and_query: Option<&str>) -> String {
    let mut target = path_and_query
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PATH)
        .to_owned();
    if !target.starts_with('/') {
        target.insert(0, '/');
    }
    format!(
        "{}://{}{}",
        scheme.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SCHEME),
        host.filter(|h| !h.is_empty()).unwrap_or(DEFAULT_HOST),
        target
    )
}

fn parse_query(query: Option<&str>) -> indexmap::IndexMap<String, String> {
    query
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}
