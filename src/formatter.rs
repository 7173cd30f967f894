use crate::{
    convert::{args_to_string, escape_markdown, time_to_string},
    excerpt::Excerpt,
    models::{ExceptionRecord, RequestSnapshot, StackFrame},
    options::{FormatOptions, UNKNOWN_VERSION},
    redact::redact,
    Error,
};
use chrono::{Local, NaiveDateTime};
use log::debug;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;

/// Name of the environment variable [`Formatter::from_env`] reads options from.
pub const OPTIONS_ENV_VAR: &str = "EXCEPTION_MARKDOWN_OPTIONS";

/// Rendered in place of request parameters that could not be serialized.
const UNSERIALIZABLE: &str = "\"[unserializable]\"";

const JSON_INDENT: &[u8] = b"    ";

/// Formats errors as Markdown reports.
///
/// ```
/// use exception_markdown::{ExceptionRecord, Formatter, RequestSnapshot};
///
/// let error = ExceptionRecord::new("ConfigError", "missing key `port`", "src/config.rs", 42);
/// let request = RequestSnapshot::new()
///     .with_url("http://localhost/settings")
///     .with_method("POST")
///     .with_body_param("password", "hunter2");
///
/// let report = Formatter::new().format(&error, Some(&request));
/// assert!(report.starts_with("# Error\n\n**ConfigError**: missing key \\`port\\`\n"));
/// assert!(report.contains("***REDACTED***"));
/// assert!(!report.contains("hunter2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    options: FormatOptions,
    timestamp: Option<NaiveDateTime>,
}

impl Formatter {
    /// Create a formatter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with options from the `EXCEPTION_MARKDOWN_OPTIONS` environment
    /// variable. See [`FormatOptions`] for the format. Defaults are used if it is not set.
    pub fn from_env() -> Result<Self, Error> {
        match std::env::var(OPTIONS_ENV_VAR) {
            Ok(options) => Ok(Self::new().with_options(options.parse()?)),
            Err(std::env::VarError::NotPresent) => Ok(Self::new()),
            Err(err) => Err(Error::Env(err)),
        }
    }

    /// Replace all options.
    pub fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the number of source lines shown around the failing line.
    ///
    /// Default: 5
    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.options.context_lines = context_lines;
        self
    }

    /// Set the number of characters after which string arguments are cut off.
    ///
    /// Default: 50
    pub fn with_string_limit(mut self, string_limit: usize) -> Self {
        self.options.string_limit = string_limit;
        self
    }

    /// Set the language tag of the code excerpt.
    ///
    /// Default: `rust`
    pub fn with_code_language(mut self, language: impl Into<String>) -> Self {
        self.options.code_language = language.into();
        self
    }

    /// Set the runtime name and version listed in the environment section.
    ///
    /// ```
    /// let formatter = exception_markdown::Formatter::new()
    ///     .with_runtime("Rust", "1.81.0");
    /// ```
    pub fn with_runtime(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.options.runtime_name = name.into();
        self.options.runtime_version = version.into();
        self
    }

    /// Set the host debugger name and version listed in the environment section.
    pub fn with_debugger(mut self, name: impl Into<String>, version: Option<String>) -> Self {
        self.options.debugger_name = name.into();
        self.options.debugger_version = version;
        self
    }

    /// Render this time instead of the current local time.
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Current options.
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Format an error and, if given, the request it happened in.
    ///
    /// The request section is included whenever `request` is `Some`, even if the snapshot is
    /// empty. Never fails: sections that can't be produced are left out.
    pub fn format(&self, exception: &ExceptionRecord, request: Option<&RequestSnapshot>) -> String {
        let mut markdown = Vec::new();

        markdown.push("# Error".to_string());
        markdown.push(String::new());
        markdown.push(exception_header(exception));
        markdown.push(String::new());

        markdown.push("## Source file".to_string());
        markdown.push(String::new());
        markdown.push(source_location(exception));
        markdown.push(String::new());

        if let Some(excerpt) = self.code_excerpt(exception) {
            markdown.push(format!("```{}", self.options.code_language));
            markdown.extend(excerpt.rows());
            markdown.push("```".to_string());
            markdown.push(String::new());
        }

        markdown.push("## Stack trace".to_string());
        markdown.push(String::new());
        markdown.push("```".to_string());
        markdown.extend(
            exception
                .frames
                .iter()
                .enumerate()
                .map(|(index, frame)| self.stack_frame(index, frame)),
        );
        markdown.push("```".to_string());
        markdown.push(String::new());

        if let Some(previous) = exception.previous.as_deref() {
            markdown.push("## Previous exception".to_string());
            markdown.push(String::new());
            markdown.push(exception_header(previous));
            markdown.push(String::new());
            markdown.push(source_location(previous));
            markdown.push(String::new());
        }

        if let Some(request) = request {
            request_section(&mut markdown, request);
        }

        markdown.push("## Environment".to_string());
        markdown.push(String::new());
        markdown.push(format!(
            "- **{}**: {}",
            self.options.runtime_name, self.options.runtime_version
        ));
        markdown.push(format!(
            "- **{}**: {}",
            self.options.debugger_name,
            self.options
                .debugger_version
                .as_deref()
                .unwrap_or(UNKNOWN_VERSION)
        ));
        markdown.push(format!(
            "- **Date**: {}",
            time_to_string(
                self.timestamp
                    .unwrap_or_else(|| Local::now().naive_local())
            )
        ));
        markdown.push(String::new());

        markdown.join("\n")
    }

    fn code_excerpt(&self, exception: &ExceptionRecord) -> Option<Excerpt> {
        match Excerpt::read(
            Path::new(&exception.file),
            exception.line as usize,
            self.options.context_lines,
        ) {
            Ok(excerpt) if !excerpt.is_empty() => Some(excerpt),
            Ok(_) => {
                debug!(
                    "Skipping code excerpt: line {} is outside of {}",
                    exception.line, exception.file
                );
                None
            }
            Err(err) => {
                debug!("Skipping code excerpt: {}", err);
                None
            }
        }
    }

    fn stack_frame(&self, index: usize, frame: &StackFrame) -> String {
        format!(
            "#{} {}:{} {}{}{}({})",
            index,
            frame.file.as_deref().unwrap_or("[internal]"),
            frame
                .line
                .map(|line| line.to_string())
                .unwrap_or_else(|| "?".into()),
            frame.type_name.as_deref().unwrap_or_default(),
            frame.call.map(|call| call.as_str()).unwrap_or_default(),
            frame.function.as_deref().unwrap_or_default(),
            args_to_string(&frame.args, self.options.string_limit)
        )
    }
}

/// Format an error with a default [`Formatter`].
pub fn format_exception(exception: &ExceptionRecord, request: Option<&RequestSnapshot>) -> String {
    Formatter::new().format(exception, request)
}

fn exception_header(exception: &ExceptionRecord) -> String {
    format!(
        "**{}**: {}",
        exception.type_name,
        escape_markdown(&exception.message)
    )
}

fn source_location(exception: &ExceptionRecord) -> String {
    format!("**File**: `{}:{}`", exception.file, exception.line)
}

fn request_section(markdown: &mut Vec<String>, request: &RequestSnapshot) {
    markdown.push("## Request".to_string());
    markdown.push(String::new());
    if let Some(url) = &request.url {
        markdown.push(format!("**URL**: `{}`", url));
    }
    if let Some(method) = &request.method {
        markdown.push(format!("**Method**: `{}`", method));
    }
    markdown.push(String::new());

    if !request.query.is_empty() {
        markdown.push("### GET parameters".to_string());
        markdown.push(String::new());
        markdown.push("```json".to_string());
        markdown.push(to_pretty_json(&request.query));
        markdown.push("```".to_string());
        markdown.push(String::new());
    }

    if !request.body.is_empty() {
        markdown.push("### POST parameters".to_string());
        markdown.push(String::new());
        markdown.push("```json".to_string());
        markdown.push(to_pretty_json(&redact(&request.body)));
        markdown.push("```".to_string());
        markdown.push(String::new());
    }

    if !request.headers().is_empty() {
        markdown.push("### Headers".to_string());
        markdown.push(String::new());
        markdown.push("```".to_string());
        markdown.extend(
            request
                .headers()
                .iter()
                .map(|(name, value)| format!("{}: {}", name, value)),
        );
        markdown.push("```".to_string());
        markdown.push(String::new());
    }
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    match try_to_pretty_json(value) {
        Ok(json) => json,
        Err(err) => {
            debug!("{}", err);
            UNSERIALIZABLE.into()
        }
    }
}

/// Pretty JSON with 4 space indentation. Non-ASCII characters are written as they are.
fn try_to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    let mut serialized = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut serialized, PrettyFormatter::with_indent(JSON_INDENT));
    value
        .serialize(&mut serializer)
        .map_err(Error::SerializeParameters)?;
    Ok(String::from_utf8_lossy(&serialized).into_owned())
}
