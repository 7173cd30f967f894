use crate::models::StackFrame;
use std::{error::Error as StdError, panic::Location, panic::PanicHookInfo};

/// Type name used for errors reached through [`StdError::source`], whose concrete type is erased.
const UNKNOWN_SOURCE_TYPE: &str = "dyn Error";

/// Type name used for panics.
pub(crate) const PANIC_TYPE: &str = "panic";

/// Read-only view of a caught error.
///
/// The cause chain is singly linked through [`previous`](Self::previous). Reports only render
/// the immediate cause.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionRecord {
    /// Name of the error type, e.g. `std::io::Error`.
    pub type_name: String,

    /// Error message.
    pub message: String,

    /// Path of the source file the error was raised in.
    pub file: String,

    /// 1-based line the error was raised on.
    pub line: u32,

    /// Call stack, innermost frame first.
    pub frames: Vec<StackFrame>,

    /// Error that caused this one.
    pub previous: Option<Box<ExceptionRecord>>,
}

impl ExceptionRecord {
    /// Create a record without stack frames or cause.
    pub fn new(
        type_name: impl Into<String>,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            file: file.into(),
            line,
            frames: Vec::new(),
            previous: None,
        }
    }

    /// Append a stack frame.
    pub fn with_frame(mut self, frame: StackFrame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Replace the stack frames.
    pub fn with_frames(mut self, frames: impl IntoIterator<Item = StackFrame>) -> Self {
        self.frames = frames.into_iter().collect();
        self
    }

    /// Set the error that caused this one.
    pub fn with_previous(mut self, previous: ExceptionRecord) -> Self {
        self.previous = Some(Box::new(previous));
        self
    }

    /// Build a record from an error value, located at the caller.
    ///
    /// The [`source`](StdError::source) chain becomes the `previous` chain. Sources carry no
    /// location of their own, so they inherit the caller's.
    ///
    /// ```
    /// use exception_markdown::ExceptionRecord;
    ///
    /// let err = "42x".parse::<u32>().unwrap_err();
    /// let record = ExceptionRecord::from_error(&err);
    /// assert!(record.type_name.ends_with("ParseIntError"));
    /// assert_eq!("invalid digit found in string", record.message);
    /// ```
    ///
    /// Type-erased errors work too, e.g. `ExceptionRecord::from_error(&*boxed)` for a
    /// `Box<dyn Error>`.
    #[track_caller]
    pub fn from_error<E>(error: &E) -> Self
    where
        E: StdError + ?Sized + 'static,
    {
        let location = Location::caller();
        let mut record = Self::new(
            std::any::type_name::<E>(),
            error.to_string(),
            location.file(),
            location.line(),
        );
        record.previous = error
            .source()
            .map(|source| Box::new(source_chain(source, location)));
        record
    }

    /// Build a record from a panic, e.g. inside a hook installed with
    /// [`std::panic::set_hook`].
    pub fn from_panic(info: &PanicHookInfo<'_>) -> Self {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("Box<dyn Any>");
        let (file, line) = info
            .location()
            .map(|location| (location.file(), location.line()))
            .unwrap_or(("<unknown>", 0));
        Self::new(PANIC_TYPE, message, file, line)
    }
}

fn source_chain(error: &(dyn StdError + 'static), location: &Location<'_>) -> ExceptionRecord {
    let mut record = ExceptionRecord::new(
        UNKNOWN_SOURCE_TYPE,
        error.to_string(),
        location.file(),
        location.line(),
    );
    record.previous = error
        .source()
        .map(|source| Box::new(source_chain(source, location)));
    record
}
