pub use crate::diagnostics::{print_error, ErrorCategory, StencilError};
pub use crate::engine::{expand_document, expand_str};

pub mod chunker;
pub mod cli;
pub mod diagnostics;
pub mod engine;
pub mod escape;
pub mod expander;
pub mod macros;
pub mod source;
pub mod syntax;
pub mod text;
