//! Call shapes and the guards that validate a cached binding.

use std::fmt;

use mosaic_core::{Value, ValueKind};

/// What a call site looks like: the kind of every logical argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CallShape {
    pub arg_kinds: Vec<ValueKind>,
}

impl CallShape {
    pub fn new(arg_kinds: impl Into<Vec<ValueKind>>) -> Self {
        Self {
            arg_kinds: arg_kinds.into(),
        }
    }

    /// The shape of a concrete argument list.
    pub fn of(args: &[Value]) -> Self {
        Self {
            arg_kinds: args.iter().map(Value::kind).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.arg_kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arg_kinds.is_empty()
    }

    pub fn kind_at(&self, index: usize) -> Option<ValueKind> {
        self.arg_kinds.get(index).copied()
    }
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.arg_kinds.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", kind)?;
        }
        Ok(())
    }
}

/// A condition on a [`CallShape`].
///
/// A binding computed for one shape stays valid for another shape exactly
/// when its guard holds for that shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    ArgCount(usize),
    ArgCountAtLeast(usize),
    ArgCountAtMost(usize),
    ArgKind { index: usize, kind: ValueKind },
    All(Vec<Guard>),
}

impl Guard {
    pub fn holds(&self, shape: &CallShape) -> bool {
        match self {
            Guard::ArgCount(n) => shape.len() == *n,
            Guard::ArgCountAtLeast(n) => shape.len() >= *n,
            Guard::ArgCountAtMost(n) => shape.len() <= *n,
            Guard::ArgKind { index, kind } => shape.kind_at(*index) == Some(*kind),
            Guard::All(guards) => guards.iter().all(|g| g.holds(shape)),
        }
    }

    /// A guard that holds for exactly `shape`: same count, same kind at every index.
    pub fn exact(shape: &CallShape) -> Guard {
        Guard::all(
            std::iter::once(Guard::ArgCount(shape.len())).chain(
                shape
                    .arg_kinds
                    .iter()
                    .enumerate()
                    .map(|(index, &kind)| Guard::ArgKind { index, kind }),
            ),
        )
    }

    /// Conjunction of the given guards, flattening nested `All`.
    pub fn all(guards: impl IntoIterator<Item = Guard>) -> Guard {
        let mut flat = Vec::new();
        for guard in guards {
            match guard {
                Guard::All(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Guard::All(flat)
        }
    }
}
