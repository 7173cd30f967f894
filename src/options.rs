use std::{num::ParseIntError, str::FromStr};

pub(crate) const DEFAULT_CONTEXT_LINES: usize = 5;
pub(crate) const DEFAULT_STRING_LIMIT: usize = 50;
pub(crate) const DEFAULT_CODE_LANGUAGE: &str = "rust";
pub(crate) const DEFAULT_RUNTIME_NAME: &str = "Rust";
/// Version of the compiler that built this crate.
pub(crate) const DEFAULT_RUNTIME_VERSION: &str = env!("EXCEPTION_MARKDOWN_RUSTC_VERSION");
pub(crate) const DEFAULT_DEBUGGER_NAME: &str = "Debugger";
pub(crate) const UNKNOWN_VERSION: &str = "unknown";
const FIELDS_SEPARATOR: char = ';';
const FIELD_KEY_VALUE_SEPARATOR: char = '=';

/// Settings of a [`Formatter`](crate::Formatter).
///
/// Can be parsed from a string of `Key=Value` fields separated by `;`:
///
/// ```
/// use exception_markdown::FormatOptions;
///
/// let options: FormatOptions = "ContextLines=3;Language=rs;DebuggerVersion=2.10.8"
///     .parse()
///     .unwrap();
/// assert_eq!(3, options.context_lines);
/// assert_eq!("rs", options.code_language);
/// assert_eq!(Some("2.10.8".to_string()), options.debugger_version);
/// ```
///
/// Keys are case-insensitive. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Lines of source shown before and after the failing line. Key: `ContextLines`.
    pub context_lines: usize,

    /// Characters of a string argument shown in stack traces before it is cut off. Key:
    /// `StringLimit`.
    pub string_limit: usize,

    /// Language tag of the code excerpt fence. Key: `Language`.
    pub code_language: String,

    /// Label of the runtime in the environment section. Key: `RuntimeName`.
    pub runtime_name: String,

    /// Version of the runtime, by default the version of the compiler that built this crate. Key:
    /// `RuntimeVersion`.
    pub runtime_version: String,

    /// Label of the host debugger in the environment section. Key: `DebuggerName`.
    pub debugger_name: String,

    /// Version of the host debugger, rendered `unknown` when not set. Key: `DebuggerVersion`.
    pub debugger_version: Option<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
            string_limit: DEFAULT_STRING_LIMIT,
            code_language: DEFAULT_CODE_LANGUAGE.into(),
            runtime_name: DEFAULT_RUNTIME_NAME.into(),
            runtime_version: DEFAULT_RUNTIME_VERSION.into(),
            debugger_name: DEFAULT_DEBUGGER_NAME.into(),
            debugger_version: None,
        }
    }
}

/// Errors of parsing [`FormatOptions`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// A field is not of the form `Key=Value`.
    #[error("invalid format")]
    InvalidFormat,
    /// A numeric field holds something else.
    #[error("invalid number for {key}: {source}")]
    InvalidNumber {
        /// Key of the field.
        key: &'static str,
        /// Underlying parse error.
        source: ParseIntError,
    },
}

impl FromStr for FormatOptions {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut options = FormatOptions::default();
        for field in s.split(FIELDS_SEPARATOR) {
            if field.trim().is_empty() {
                continue;
            }
            let (key, value) = field
                .split_once(FIELD_KEY_VALUE_SEPARATOR)
                .filter(|(_, value)| !value.contains(FIELD_KEY_VALUE_SEPARATOR))
                .ok_or(ParseError::InvalidFormat)?;
            let value = value.trim();
            match key.trim().to_lowercase().as_str() {
                "contextlines" => options.context_lines = parse_count("ContextLines", value)?,
                "stringlimit" => options.string_limit = parse_count("StringLimit", value)?,
                "language" => options.code_language = value.into(),
                "runtimename" => options.runtime_name = value.into(),
                "runtimeversion" => options.runtime_version = value.into(),
                "debuggername" => options.debugger_name = value.into(),
                "debuggerversion" => {
                    options.debugger_version = Some(value.to_string()).filter(|v| !v.is_empty())
                }
                _ => {}
            }
        }
        Ok(options)
    }
}

fn parse_count(key: &'static str, value: &str) -> Result<usize, ParseError> {
    value
        .parse()
        .map_err(|source| ParseError::InvalidNumber { key, source })
}
