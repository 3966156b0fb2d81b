//! The capability scopes require from declared entities

use crate::package::Package;
use la_arena::Idx;
use lx_intern::Symbol;
use std::fmt;

/// Index of an object in a [`ScopeTree`](crate::ScopeTree)'s object arena
pub type ObjectId<O> = Idx<O>;

/// Concrete kind of a declared entity, as shown in scope dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Named constant
    Const,
    /// Type name
    TypeName,
    /// Variable, parameter, or struct field
    Var,
    /// Function or method
    Func,
    /// Statement label
    Label,
    /// Imported package name
    PkgName,
    /// Predeclared function such as `len`
    Builtin,
    /// The predeclared `nil`
    Nil,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Const => "const",
            Self::TypeName => "type",
            Self::Var => "var",
            Self::Func => "func",
            Self::Label => "label",
            Self::PkgName => "package",
            Self::Builtin => "builtin",
            Self::Nil => "nil",
        };
        formatter.write_str(text)
    }
}

/// A declared entity that can be bound into a scope
///
/// Scopes only ever read these three properties. Which scope owns the object is
/// recorded by the tree when the object is first inserted, not on the object.
pub trait Object {
    /// Declared name
    fn name(&self) -> Symbol;

    /// Package the declaration originates from, `None` for predeclared objects
    fn pkg(&self) -> Option<&Package>;

    /// Concrete kind, for diagnostics
    fn kind(&self) -> ObjectKind;
}

/// Reports whether `name` is exported, i.e. starts with an upper-case letter
///
/// Exported names are the same identifier in every package.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
