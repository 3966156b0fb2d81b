//! Package identities used as lookup qualifiers

use lx_intern::Symbol;

/// Identity of the package a declaration originates from
///
/// Only the import path takes part in the identity rule; the name is what the
/// package clause says and is kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Package {
    path: Symbol,
    name: Symbol,
}

impl Package {
    /// Creates a package identity from its import path and package name
    #[must_use]
    pub const fn new(path: Symbol, name: Symbol) -> Self {
        Self { path, name }
    }

    /// Import path, the key compared by qualified lookups
    #[must_use]
    pub const fn path(&self) -> Symbol {
        self.path
    }

    /// Declared package name
    #[must_use]
    pub const fn name(&self) -> Symbol {
        self.name
    }

    /// Whether `self` and `other` denote the same package
    ///
    /// Packages are not canonicalised, so two values built for the same import
    /// path compare equal here even if their names differ.
    #[must_use]
    pub fn same_path(&self, other: &Self) -> bool {
        self.path == other.path
    }
}
