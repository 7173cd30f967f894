use crate::models::ArgValue;
use std::fmt;

/// Marker between the enclosing type and the function of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOperator {
    /// Associated function call, rendered `::`.
    Static,
    /// Method call on a value, rendered `->`.
    Instance,
}

impl CallOperator {
    /// Symbol used in stack traces.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOperator::Static => "::",
            CallOperator::Instance => "->",
        }
    }
}

impl fmt::Display for CallOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call site of a stack trace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackFrame {
    /// Source file. `None` for frames without source, e.g. inside the runtime.
    pub file: Option<String>,

    /// 1-based line.
    pub line: Option<u32>,

    /// Enclosing type of the called function.
    pub type_name: Option<String>,

    /// Kind of call into `type_name`.
    pub call: Option<CallOperator>,

    /// Called function.
    pub function: Option<String>,

    /// Call arguments.
    pub args: Vec<ArgValue>,
}

impl StackFrame {
    /// Create a frame calling `function`, without location.
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: Some(function.into()),
            ..Self::default()
        }
    }

    /// Set file and line.
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Set the enclosing type and how it is called.
    pub fn with_type(mut self, type_name: impl Into<String>, call: CallOperator) -> Self {
        self.type_name = Some(type_name.into());
        self.call = Some(call);
        self
    }

    /// Set the call arguments.
    pub fn with_args(mut self, args: impl IntoIterator<Item = ArgValue>) -> Self {
        self.args = args.into_iter().collect();
        self
    }
}
