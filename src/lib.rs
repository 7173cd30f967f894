//! Format errors and panics as Markdown reports that are easy to paste into an issue or a chat.
//!
//! A report contains the error type and message, the failing source location with a few lines
//! of code around it, the stack trace, the error that caused it, the request the error happened
//! in and some details about the environment. Request body parameters that look sensitive
//! (passwords, tokens, API keys, credit card numbers) are redacted.
//!
//! # Usage
//!
//! ```rust
//! use exception_markdown::{format_exception, ArgValue, CallOperator, ExceptionRecord, StackFrame};
//!
//! let error = ExceptionRecord::new(
//!     "InvalidArgument",
//!     "user_id must be positive (got -1)",
//!     "src/users.rs",
//!     27,
//! )
//! .with_frame(
//!     StackFrame::new("find")
//!         .with_location("src/users.rs", 27)
//!         .with_type("UserRepository", CallOperator::Instance)
//!         .with_args(vec![ArgValue::from(-1)]),
//! );
//!
//! let report = format_exception(&error, None);
//! assert!(report.contains("**InvalidArgument**: user\\_id must be positive \\(got \\-1\\)"));
//! assert!(report.contains("#0 src/users.rs:27 UserRepository->find(-1)"));
//! ```
//!
//! Errors can also be captured from any [`std::error::Error`] with
//! [`ExceptionRecord::from_error`], or from a panic hook with [`ExceptionRecord::from_panic`].
//!
//! # Report layout
//!
//! | Section                | Included                                           |
//! | ---------------------- | -------------------------------------------------- |
//! | `# Error`              | always                                             |
//! | `## Source file`       | always; code excerpt only if the file is readable  |
//! | `## Stack trace`       | always                                             |
//! | `## Previous exception`| if the error has a cause                           |
//! | `## Request`           | if a [`RequestSnapshot`] is given, even if empty   |
//! | `## Environment`       | always                                             |
//!
//! Messages are Markdown-escaped. Paths, URLs, JSON and code are included as they are.
//!
//! # Requests
//!
//! Snapshots can be built by hand or collected from an [`http::Request`] or CGI variables, see
//! [`collect`]. `Authorization` and `Cookie` headers are never included. Body parameters go
//! through [`redact`]; query parameters and headers don't.
//!
//! # Debugger panels
//!
//! [`Extension`] registers a "Copy Markdown" panel with any [`PanelHost`].
#![doc(html_root_url = "https://docs.rs/exception-markdown/0.3.0")]
#![deny(missing_docs, unreachable_pub, missing_debug_implementations)]
#![cfg_attr(test, deny(warnings))]

pub mod collect;
mod convert;
mod error;
mod excerpt;
mod extension;
mod formatter;
mod models;
mod options;
mod panel;
mod redact;

pub use error::Error;
pub use extension::{Extension, PanelHost, PanelRenderer, RequestSource};
pub use formatter::{format_exception, Formatter, OPTIONS_ENV_VAR};
pub use models::{ArgValue, CallOperator, ExceptionRecord, RequestSnapshot, StackFrame};
pub use options::{FormatOptions, ParseError};
pub use panel::{render_panel, Panel, Placement, PANEL_TITLE};
pub use redact::{is_sensitive_key, redact, REDACTED, SENSITIVE_TERMS};
