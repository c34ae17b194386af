//! The stack-driven macro expansion engine.
//!
//! The expander consumes chunks from the top of an input [`WorkStack`],
//! appends finished literal text to an output stack, and pushes newly
//! generated chunks back onto the input for another round — that re-injection
//! is how nested groups, branch bodies, included files, and substituted
//! templates recurse without a call stack. The one exception is
//! `expandafter`, whose first operand must be held raw while the second runs
//! to completion in a genuine nested sub-pass.
//!
//! The macro table is the only state shared across the whole expansion; it is
//! threaded through every call as an explicit parameter. Every violation is
//! fatal: the first error aborts the run.

use crate::chunker;
use crate::diagnostics::StencilError;
use crate::escape::collapse_intermediate;
use crate::macros::{invocation_name, Builtin, Macro, MacroTable};
use crate::source;
use crate::syntax::{is_preserved, is_special, is_valid_arg, BRACE_CLOSE, BRACE_OPEN, ESCAPE, PLACEHOLDER};
use crate::text::{Text, WorkStack};

/// Expands every chunk on `input`, appending finished literal text to
/// `output` in reverse document order (flip once before assembly).
pub fn process(
    input: &mut WorkStack,
    table: &mut MacroTable,
    output: &mut WorkStack,
) -> Result<(), StencilError> {
    while let Some(head) = input.pop() {
        if head.len() == 1 {
            expand_single(head, input, output);
            continue;
        }
        match head.first() {
            Some(ESCAPE) => expand_invocation(head, input, table, output)?,
            Some(BRACE_OPEN) => reinject_group(&head, input),
            _ => output.push(collapse_intermediate(&head)),
        }
    }
    Ok(())
}

/// A one-byte chunk. A lone escape directly followed by a chunk that leads
/// with a special byte fuses with it into a single literal unit; anything
/// else passes straight through.
fn expand_single(head: Text, input: &mut WorkStack, output: &mut WorkStack) {
    if head.first() == Some(ESCAPE)
        && input.top().and_then(Text::first).map_or(false, is_special)
    {
        if let Some(next) = input.pop() {
            let mut merged = head;
            merged.append(&next);
            // Reinsert the raw merge, then move it to the output uncollapsed.
            // Its leading pair is escape-plus-special, exactly the kind the
            // intermediate collapse keeps, so nothing is lost by skipping it.
            input.push(merged);
        }
        if let Some(merged) = input.pop() {
            output.push(merged);
        }
        return;
    }
    output.push(head);
}

/// A multi-byte chunk that begins with the escape byte: either redundant
/// escaping of a special/preserved byte, or a macro invocation.
fn expand_invocation(
    head: Text,
    input: &mut WorkStack,
    table: &mut MacroTable,
    output: &mut WorkStack,
) -> Result<(), StencilError> {
    if head
        .byte(1)
        .map_or(false, |b| is_special(b) || is_preserved(b))
    {
        output.push(collapse_intermediate(&head));
        return Ok(());
    }

    let Some(index) = table.resolve(&head) else {
        return Err(StencilError::UndefinedMacro {
            name: Text::from_slice(invocation_name(&head)).to_lossy().into_owned(),
        });
    };

    match Builtin::from_index(index) {
        Some(Builtin::Def) => expand_def(input, table),
        Some(Builtin::Undef) => expand_undef(input, table),
        Some(Builtin::Ifdef) => expand_branch(input, table, Condition::Defined),
        Some(Builtin::If) => expand_branch(input, table, Condition::Truthy),
        Some(Builtin::Include) => expand_include(input),
        Some(Builtin::ExpandAfter) => expand_after(input, table),
        None => expand_custom(index, input, table),
    }
}

/// `\def{name}{value}`: registers a user macro. Consumes two argument chunks;
/// name and value validation lives in [`MacroTable::define`].
fn expand_def(input: &mut WorkStack, table: &mut MacroTable) -> Result<(), StencilError> {
    let (name_arg, value_arg) = take2(input, "def")?;
    table.define(&name_arg, &value_arg)
}

/// `\undef{name}`: removes a currently defined, non-protected macro.
fn expand_undef(input: &mut WorkStack, table: &mut MacroTable) -> Result<(), StencilError> {
    let target = take1(input, "undef")?;
    let Some(index) = table.resolve(&target) else {
        return Err(StencilError::UndefinedMacro {
            name: Text::from_slice(invocation_name(&target)).to_lossy().into_owned(),
        });
    };
    table.undefine(index)
}

enum Condition {
    /// `ifdef`: taken when the condition chunk names a defined macro.
    Defined,
    /// `if`: textual truthiness — the raw condition chunk, braces included,
    /// is at least three bytes long.
    Truthy,
}

/// `\ifdef{c}{then}{else}` / `\if{c}{then}{else}`: selects a branch, strips
/// its braces, and re-tokenizes its content onto the input stack.
fn expand_branch(
    input: &mut WorkStack,
    table: &MacroTable,
    condition: Condition,
) -> Result<(), StencilError> {
    let name = match condition {
        Condition::Defined => "ifdef",
        Condition::Truthy => "if",
    };
    if input.len() < 3 {
        return Err(missing(name));
    }
    for depth in 0..3 {
        if let Some(arg) = input.peek(depth) {
            if !is_valid_arg(arg.as_bytes()) {
                return Err(invalid(name, arg));
            }
        }
    }

    let (cond, then_branch, else_branch) = take3(input, name)?;
    let taken = match condition {
        Condition::Defined => table.resolve(&cond).is_some(),
        Condition::Truthy => cond.len() >= 3,
    };
    let branch = if taken { then_branch } else { else_branch };
    chunker::chunk_into(&branch.strip_braces(), input);
    Ok(())
}

/// `\include{path}`: reads the named file and re-tokenizes its contents onto
/// the input stack. An unreadable file is fatal.
fn expand_include(input: &mut WorkStack) -> Result<(), StencilError> {
    let path_arg = take1(input, "include")?;
    if !is_valid_arg(path_arg.as_bytes()) {
        return Err(invalid("include", &path_arg));
    }
    let contents = source::read_file_text(&path_arg.strip_braces())?;
    chunker::chunk_into(&contents, input);
    Ok(())
}

/// `\expandafter{held}{eager}`: the second operand is expanded to completion
/// in an isolated sub-pass while the first is kept raw; the concatenation
/// `held ++ expanded(eager)` is then re-tokenized, so the held text gets its
/// turn against whatever the sub-pass defined.
fn expand_after(input: &mut WorkStack, table: &mut MacroTable) -> Result<(), StencilError> {
    if input.len() < 2 {
        return Err(missing("expandafter"));
    }
    for depth in 0..2 {
        if let Some(arg) = input.peek(depth) {
            if !is_valid_arg(arg.as_bytes()) {
                return Err(invalid("expandafter", arg));
            }
        }
    }
    let (held_arg, eager_arg) = take2(input, "expandafter")?;

    let mut sub_input = WorkStack::new();
    chunker::chunk_into(&eager_arg.strip_braces(), &mut sub_input);
    let mut sub_output = WorkStack::new();
    process(&mut sub_input, table, &mut sub_output)?;

    let mut combined = held_arg.strip_braces();
    combined.append(&sub_output.flip().concat());
    chunker::chunk_into(&combined, input);
    Ok(())
}

/// A defined user macro: substitutes its argument into the stored value and
/// re-tokenizes the result onto the input stack.
fn expand_custom(
    index: usize,
    input: &mut WorkStack,
    table: &MacroTable,
) -> Result<(), StencilError> {
    let name = table
        .get(index)
        .map(|entry| entry.name().to_string())
        .unwrap_or_default();
    let argument = take1(input, &name)?;
    if !is_valid_arg(argument.as_bytes()) {
        return Err(invalid(&name, &argument));
    }

    let Some(template) = table.get(index).and_then(Macro::value) else {
        // A resolved non-builtin index always carries a value; this arm only
        // guards against a stale index.
        return Err(StencilError::UndefinedMacro { name });
    };
    let substituted = substitute(template, &argument.strip_braces());
    chunker::chunk_into(&substituted, input);
    Ok(())
}

/// A literal brace group that reached the top of the stack without being
/// consumed as an argument: its interior is re-tokenized and reprocessed as
/// ordinary content, bracketed by standalone brace chunks so the braces
/// themselves survive into the output.
fn reinject_group(head: &Text, input: &mut WorkStack) {
    input.push(Text::from_byte(BRACE_CLOSE));
    chunker::chunk_into(&head.strip_braces(), input);
    input.push(Text::from_byte(BRACE_OPEN));
}

/// Builds a custom macro's substitution: escape pairs in the stored value
/// pass through untouched, every bare placeholder byte is replaced with the
/// argument text verbatim.
fn substitute(template: &Text, argument: &Text) -> Text {
    let bytes = template.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() + argument.len());

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            ESCAPE => {
                out.push(bytes[i]);
                i += 1;
                if i < bytes.len() {
                    out.push(bytes[i]);
                    i += 1;
                }
            }
            PLACEHOLDER => {
                out.extend_from_slice(argument.as_bytes());
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }

    Text::from_bytes(out)
}

fn take1(input: &mut WorkStack, name: &str) -> Result<Text, StencilError> {
    input.pop().ok_or_else(|| missing(name))
}

fn take2(input: &mut WorkStack, name: &str) -> Result<(Text, Text), StencilError> {
    match (input.pop(), input.pop()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(missing(name)),
    }
}

fn take3(input: &mut WorkStack, name: &str) -> Result<(Text, Text, Text), StencilError> {
    match (input.pop(), input.pop(), input.pop()) {
        (Some(a), Some(b), Some(c)) => Ok((a, b, c)),
        _ => Err(missing(name)),
    }
}

fn missing(name: &str) -> StencilError {
    StencilError::MissingArgument { name: name.into() }
}

fn invalid(name: &str, argument: &Text) -> StencilError {
    StencilError::InvalidArgument {
        name: name.into(),
        argument: argument.to_lossy().into_owned(),
    }
}
