//! Defines the command-line arguments for the stencil CLI.
//!
//! This module uses the `clap` crate with its "derive" feature. The surface
//! is deliberately flat: positional input files and nothing else.

use clap::Parser;
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "stencil",
    version,
    about = "A TeX-like textual macro preprocessor."
)]
pub struct StencilArgs {
    /// Input files, concatenated in argument order; standard input when omitted.
    pub files: Vec<PathBuf>,
}
