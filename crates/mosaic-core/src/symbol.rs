//! Interned symbols.
//!
//! Names are interned into a single process-wide table and never freed, so a
//! [`Symbol`] is a `Copy` index that can be compared and hashed cheaply and
//! resolved back to a `&'static str` at any time.

use std::fmt;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

struct Interner {
    lookup: FxHashMap<&'static str, Symbol>,
    names: Vec<&'static str>,
}

impl Interner {
    fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&symbol) = self.lookup.get(name) {
            return symbol;
        }
        let symbol = Symbol(self.names.len() as u32);
        let name: &'static str = Box::leak(name.to_owned().into_boxed_str());
        self.names.push(name);
        self.lookup.insert(name, symbol);
        symbol
    }
}

static INTERNER: Lazy<Mutex<Interner>> = Lazy::new(|| {
    Mutex::new(Interner {
        lookup: FxHashMap::default(),
        names: Vec::new(),
    })
});

/// An interned name.
///
/// # Example
///
/// ```
/// use mosaic_core::Symbol;
///
/// let a = Symbol::intern("counter");
/// let b = Symbol::intern("counter");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "counter");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Sentinel that never names anything.
    ///
    /// Used where a symbol slot must be filled before a real name is known;
    /// node constructors reject it.
    pub const INVALID: Symbol = Symbol(u32::MAX);

    /// Intern `name`, returning the existing symbol if it was seen before.
    pub fn intern(name: &str) -> Self {
        INTERNER.lock().intern(name)
    }

    /// The interned text. The invalid sentinel resolves to `""`.
    pub fn as_str(self) -> &'static str {
        if self == Self::INVALID {
            return "";
        }
        INTERNER
            .lock()
            .names
            .get(self.0 as usize)
            .copied()
            .unwrap_or("")
    }

    /// Whether this is the invalid sentinel.
    #[inline]
    pub fn is_invalid(self) -> bool {
        self == Self::INVALID
    }

    /// Whether the interned text is empty.
    pub fn is_empty(self) -> bool {
        self.as_str().is_empty()
    }

    /// Raw interner index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            write!(f, "Symbol(<invalid>)")
        } else {
            write!(f, "Symbol({:?})", self.as_str())
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::intern(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_stable() {
        let a = Symbol::intern("alpha");
        let b = Symbol::intern("beta");
        assert_ne!(a, b);
        assert_eq!(Symbol::intern("alpha"), a);
        assert_eq!(b.as_str(), "beta");
    }

    #[test]
    fn empty_symbol() {
        let empty = Symbol::intern("");
        assert!(empty.is_empty());
        assert!(!empty.is_invalid());
    }

    #[test]
    fn invalid_symbol() {
        assert!(Symbol::INVALID.is_invalid());
        assert!(Symbol::INVALID.is_empty());
        assert_eq!(format!("{:?}", Symbol::INVALID), "Symbol(<invalid>)");
    }

    #[test]
    fn intern_from_many_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| Symbol::intern("shared-name")))
            .collect();
        let symbols: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(symbols.windows(2).all(|w| w[0] == w[1]));
    }
}
