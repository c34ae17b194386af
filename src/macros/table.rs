//! Macro table: storage and lookup for macro definitions.
//!
//! The table is a slot array. The six protected entries occupy indices 0–5
//! for the lifetime of the table; user macros fill the region after them.
//! `undefine` leaves a hole rather than shifting later entries, so an index
//! stays valid until the next growth; growth doubles the capacity and
//! compacts the holes out. Names are unique among live entries.

use crate::diagnostics::StencilError;
use crate::macros::Builtin;
use crate::syntax::{arg_is_alnum, is_valid_arg, is_valid_def_arg, BRACE_CLOSE, BRACE_OPEN, ESCAPE};
use crate::text::Text;

/// Number of protected entries at the front of the table.
pub const PROTECTED_MACROS: usize = 6;

const INITIAL_CAPACITY: usize = 8;

/// One table entry. Protected entries carry no value; user entries always do.
#[derive(Debug, Clone)]
pub struct Macro {
    name: Text,
    value: Option<Text>,
}

impl Macro {
    pub fn name(&self) -> &Text {
        &self.name
    }

    pub fn value(&self) -> Option<&Text> {
        self.value.as_ref()
    }
}

/// Extracts the lookup name from an invocation or argument chunk: a leading
/// `{` or `\` is dropped, and a trailing `}` is dropped unless the chunk
/// began with an escape.
pub fn invocation_name(chunk: &Text) -> &[u8] {
    let bytes = chunk.as_bytes();
    if bytes.is_empty() {
        return bytes;
    }
    let start = usize::from(bytes[0] == BRACE_OPEN || bytes[0] == ESCAPE);
    let end = if bytes[bytes.len() - 1] == BRACE_CLOSE && bytes[0] != ESCAPE {
        bytes.len() - 1
    } else {
        bytes.len()
    };
    if end <= start {
        return &[];
    }
    &bytes[start..end]
}

/// The program-wide macro table, threaded explicitly through the expander.
#[derive(Debug, Clone)]
pub struct MacroTable {
    slots: Vec<Option<Macro>>,
    /// Next insertion index. Monotonic between growths; holes left by
    /// `undefine` are only reclaimed when the table grows and compacts.
    cursor: usize,
    live: usize,
}

impl Default for MacroTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroTable {
    /// Creates a table preloaded with the six protected macros.
    pub fn new() -> Self {
        let mut slots: Vec<Option<Macro>> = vec![None; INITIAL_CAPACITY];
        for builtin in Builtin::ALL {
            slots[builtin as usize] = Some(Macro {
                name: Text::from(builtin.name()),
                value: None,
            });
        }
        Self {
            slots,
            cursor: PROTECTED_MACROS,
            live: PROTECTED_MACROS,
        }
    }

    /// Linear scan over live slots for an exact name match.
    pub fn lookup(&self, name: &[u8]) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.slots
            .iter()
            .position(|slot| matches!(slot, Some(entry) if entry.name.as_bytes() == name))
    }

    /// Resolves an invocation or argument chunk against the table.
    pub fn resolve(&self, chunk: &Text) -> Option<usize> {
        self.lookup(invocation_name(chunk))
    }

    pub fn get(&self, index: usize) -> Option<&Macro> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// The stored value template of a live user macro.
    pub fn value(&self, index: usize) -> Option<&Text> {
        self.get(index).and_then(Macro::value)
    }

    pub fn is_protected(index: usize) -> bool {
        index < PROTECTED_MACROS
    }

    /// Number of live entries, builtins included.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Registers a user macro from its raw brace arguments.
    ///
    /// The name must be a well-formed brace argument with a non-empty,
    /// alphanumeric interior that does not already resolve; the value any
    /// balanced brace argument. Both are stored with their outer braces
    /// stripped.
    pub fn define(&mut self, name_arg: &Text, value_arg: &Text) -> Result<(), StencilError> {
        if self.resolve(name_arg).is_some() {
            return Err(StencilError::DuplicateDefinition {
                name: name_arg.strip_braces().to_lossy().into_owned(),
            });
        }
        if !is_valid_def_arg(name_arg.as_bytes()) || !arg_is_alnum(name_arg.as_bytes()) {
            return Err(StencilError::InvalidArgument {
                name: "def".into(),
                argument: name_arg.to_lossy().into_owned(),
            });
        }
        if !is_valid_arg(value_arg.as_bytes()) {
            return Err(StencilError::InvalidArgument {
                name: "def".into(),
                argument: value_arg.to_lossy().into_owned(),
            });
        }

        if self.cursor + 1 == self.slots.len() || self.live == self.slots.len() {
            self.grow_and_compact();
        }
        self.slots[self.cursor] = Some(Macro {
            name: name_arg.strip_braces(),
            value: Some(value_arg.strip_braces()),
        });
        self.cursor += 1;
        self.live += 1;
        Ok(())
    }

    /// Removes the macro at `index`, leaving a hole until the next growth.
    pub fn undefine(&mut self, index: usize) -> Result<(), StencilError> {
        if Self::is_protected(index) {
            let name = match self.get(index) {
                Some(entry) => entry.name().to_string(),
                None => String::new(),
            };
            return Err(StencilError::ProtectedMacro { name });
        }
        match self.slots.get_mut(index) {
            Some(slot @ Some(_)) => {
                *slot = None;
                self.live -= 1;
                Ok(())
            }
            _ => Err(StencilError::UndefinedMacro {
                name: format!("#{index}"),
            }),
        }
    }

    /// Doubles capacity, moving live entries to the front in order. The
    /// protected entries are always live and first, so they keep indices 0–5.
    fn grow_and_compact(&mut self) {
        let capacity = self.slots.len() * 2;
        let mut slots: Vec<Option<Macro>> = Vec::with_capacity(capacity);
        for slot in self.slots.drain(..) {
            if slot.is_some() {
                slots.push(slot);
            }
        }
        self.cursor = slots.len();
        slots.resize(capacity, None);
        self.slots = slots;
    }
}
