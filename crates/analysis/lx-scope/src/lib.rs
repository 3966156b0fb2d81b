//! Lexical scopes for name resolution
//!
//! This crate provides the symbol table a resolver uses to bind identifier uses to
//! declarations. Scopes form a tree mirroring lexical nesting
//! (universe → package → file → function → block) and hold their declarations in
//! insertion order.
//!
//! # Architecture
//!
//! - **Scope tree**: arena of scopes, each with an optional parent and an ordered entry list
//! - **Objects**: declared entities, stored in an arena and described by the [`Object`] trait
//! - **Identity rule**: two names are the same identifier unless they are spelled
//!   differently, or declared in different packages and not exported
//!
//! # Usage
//!
//! ```rust,ignore
//! use lx_scope::{ScopeKind, ScopeTree};
//!
//! let mut tree = ScopeTree::new(interner);
//! let universe = tree.new_scope(None, ScopeKind::Universe);
//! let package = tree.new_scope(Some(universe), ScopeKind::Package);
//! if let Err(existing) = tree.declare(package, decl) {
//!     // report the redeclaration
//! }
//! let binding = tree.scope(package).lookup_parent(name);
//! ```

pub mod config;
pub mod error;
pub mod object;
pub mod package;
pub mod scope;

pub use config::ScopeConfig;
pub use error::ConfigError;
pub use lx_intern::{Interner, Symbol};
pub use object::{is_exported, Object, ObjectId, ObjectKind};
pub use package::Package;
pub use scope::{Ancestors, ScopeId, ScopeKind, ScopeRef, ScopeTree};
