//! String interning for identifiers and package paths
//!
//! Every name a scope stores is a [`Symbol`]. Comparing two symbols is an integer
//! comparison, so scope lookups never touch string data except to apply the
//! exported-name casing rule.

pub use lasso::Spur as Symbol;
use lasso::ThreadedRodeo;
use std::sync::Arc;

/// Shared string interner
///
/// Clones share the same underlying table, so a populated universe and every
/// per-unit copy of it agree on symbol values.
#[derive(Clone)]
pub struct Interner {
    inner: Arc<ThreadedRodeo>,
}

impl Interner {
    /// Creates an empty interner
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ThreadedRodeo::new()),
        }
    }

    /// Interns `text`, returning the existing symbol if it was seen before
    pub fn intern(&self, text: &str) -> Symbol {
        self.inner.get_or_intern(text)
    }

    /// Returns the symbol for `text` without interning it
    ///
    /// A string that was never interned cannot name any declaration, which lets
    /// callers treat `None` as "not found" before touching a scope.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Symbol> {
        self.inner.get(text)
    }

    /// Returns the string a symbol was interned from
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.inner.resolve(&sym)
    }

    /// Like [`Interner::resolve`], but returns `None` for symbols from another interner
    #[must_use]
    pub fn try_resolve(&self, sym: Symbol) -> Option<&str> {
        self.inner.try_resolve(&sym)
    }

    /// Number of distinct strings interned so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether nothing has been interned yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
