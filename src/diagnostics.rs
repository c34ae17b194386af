//! The unified, `miette`-based diagnostic system for the expansion pipeline.
//!
//! Every failure mode of the preprocessor is a variant of [`StencilError`].
//! All of them are fatal: the first error aborts the whole run, there is no
//! partial-success or resumable state. The CLI renders errors through
//! [`print_error`]; library callers get the typed value through `Result`.

use miette::Diagnostic;
use thiserror::Error;

/// Type-safe error classification that corresponds to `StencilError` variants.
/// Used by test code instead of fragile string matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Macro table violations: redefinition, removing a built-in.
    Table,
    /// Expansion-time violations: bad or missing arguments, unknown macros.
    Expand,
    /// Input acquisition failures (unreadable file or stream).
    Io,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Table => "Table",
            ErrorCategory::Expand => "Expand",
            ErrorCategory::Io => "Io",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for every preprocessor failure mode.
///
/// Variants carry the failing construct (macro name, offending argument text,
/// or file path) so the diagnostic identifies what aborted the run.
#[derive(Debug, Error, Diagnostic)]
pub enum StencilError {
    #[error("missing argument(s) for '\\{name}'")]
    #[diagnostic(
        code(stencil::expand::missing_argument),
        help("every macro argument is a brace-delimited group: \\name{{argument}}")
    )]
    MissingArgument { name: String },

    #[error("malformed argument for '\\{name}': `{argument}`")]
    #[diagnostic(
        code(stencil::expand::invalid_argument),
        help("arguments are brace groups with balanced, unescaped braces; new macro names must be non-empty and alphanumeric")
    )]
    InvalidArgument { name: String, argument: String },

    #[error("undefined macro '\\{name}'")]
    #[diagnostic(
        code(stencil::expand::undefined_macro),
        help("define it first with \\def{{name}}{{value}}, or escape the backslash to emit the text literally")
    )]
    UndefinedMacro { name: String },

    #[error("macro '{name}' is already defined")]
    #[diagnostic(
        code(stencil::table::duplicate_definition),
        help("remove the existing definition with \\undef{{name}} before redefining it")
    )]
    DuplicateDefinition { name: String },

    #[error("cannot undefine protected macro '{name}'")]
    #[diagnostic(
        code(stencil::table::protected_macro),
        help("def, undef, ifdef, if, include, and expandafter are built in and can never be removed")
    )]
    ProtectedMacro { name: String },

    #[error("cannot read '{path}'")]
    #[diagnostic(code(stencil::io::file_error))]
    FileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StencilError {
    /// Get the error category for test assertions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingArgument { .. }
            | Self::InvalidArgument { .. }
            | Self::UndefinedMacro { .. } => ErrorCategory::Expand,

            Self::DuplicateDefinition { .. } | Self::ProtectedMacro { .. } => ErrorCategory::Table,

            Self::FileError { .. } => ErrorCategory::Io,
        }
    }
}

/// Prints a `StencilError` with full miette diagnostics.
///
/// This provides rich error formatting with codes and help text. Use this for
/// user-facing error display in the CLI; library callers should propagate the
/// typed error instead.
pub fn print_error(error: StencilError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
