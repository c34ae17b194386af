//! Handles all user-facing output for the CLI.
//!
//! The finished document goes to stdout as raw bytes — it is not assumed to
//! be UTF-8. Diagnostics go to stderr, colorized only when stderr is a
//! terminal.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::text::Text;

/// Writes the finished document to stdout and flushes.
pub fn write_document(document: &Text) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(document.as_bytes())?;
    handle.flush()
}

/// Prints a one-line abort banner ahead of the rendered diagnostic.
pub fn print_abort_banner() {
    let choice = if atty::is(atty::Stream::Stderr) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(choice);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = writeln!(&mut stderr, "stencil: expansion aborted");
    let _ = stderr.reset();
}
