//! The stencil command-line interface.
//!
//! This module is the entry point for the binary and orchestrates the core
//! library functions: read the whole input, expand it, emit the result. The
//! first error aborts the run with a rendered diagnostic and a non-zero exit.

use clap::Parser;
use std::path::PathBuf;
use std::process;

use crate::cli::args::StencilArgs;
use crate::diagnostics::print_error;
use crate::diagnostics::StencilError;
use crate::macros::MacroTable;
use crate::text::Text;
use crate::{engine, source};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = StencilArgs::parse();

    match expand_input(&args.files) {
        Ok(document) => {
            if let Err(e) = output::write_document(&document) {
                eprintln!("stencil: cannot write output: {}", e);
                process::exit(1);
            }
        }
        Err(error) => {
            output::print_abort_banner();
            print_error(error);
            process::exit(1);
        }
    }
}

/// Reads the whole input, then runs the full expansion pipeline over it.
fn expand_input(files: &[PathBuf]) -> Result<Text, StencilError> {
    let input = source::read_input(files)?;
    let mut table = MacroTable::new();
    engine::expand_document(&input, &mut table)
}
