//! Integration test utilities for the Lexis scope table
//!
//! [`World`] plays the part of the resolver: it builds the universe, package and
//! file scopes, binds imports, and resolves plain and qualified identifiers the
//! way a checking pass drives the scope tree.

use anyhow::{anyhow, bail, Result};
use lx_intern::{Interner, Symbol};
use lx_scope::{is_exported, Object, ObjectId, ObjectKind, Package, ScopeId, ScopeKind, ScopeTree};
use std::collections::BTreeMap;
use std::sync::Once;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Predeclared type names
pub const PREDECLARED_TYPES: &[&str] = &[
    "bool", "byte", "complex64", "complex128", "error", "float32", "float64", "int", "int8",
    "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16", "uint32", "uint64",
    "uintptr",
];

/// Predeclared constants
pub const PREDECLARED_CONSTS: &[&str] = &["true", "false", "iota"];

/// Predeclared functions
pub const BUILTINS: &[&str] = &[
    "append", "cap", "close", "complex", "copy", "delete", "imag", "len", "make", "new", "panic",
    "print", "println", "real", "recover",
];

/// Installs a `RUST_LOG`-filtered subscriber that writes through the test harness
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let installed = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        if let Err(err) = installed {
            debug!(%err, "tracing subscriber already installed");
        }
    });
}

/// Declared entity used by the fixtures
#[derive(Debug, Clone)]
pub struct Decl {
    /// Declared name
    pub name: Symbol,
    /// Originating package, `None` for predeclared objects
    pub pkg: Option<Package>,
    /// Concrete kind
    pub kind: ObjectKind,
    /// Scope of the imported package, for package names
    pub imported: Option<ScopeId>,
}

impl Object for Decl {
    fn name(&self) -> Symbol {
        self.name
    }

    fn pkg(&self) -> Option<&Package> {
        self.pkg.as_ref()
    }

    fn kind(&self) -> ObjectKind {
        self.kind
    }
}

/// Identifier bindings reported by a resolution pass, keyed by use site
#[derive(Debug, Default)]
pub struct Bindings {
    by_use: BTreeMap<usize, ObjectId<Decl>>,
}

impl Bindings {
    /// Records that the identifier at `use_site` refers to `obj`
    ///
    /// # Errors
    ///
    /// Returns an error if the same use site was already bound to a different object
    pub fn record(&mut self, use_site: usize, obj: ObjectId<Decl>) -> Result<()> {
        if self
            .by_use
            .get(&use_site)
            .is_some_and(|&previous| previous != obj)
        {
            bail!("identifier at use site {use_site} reported with different objects");
        }
        self.by_use.insert(use_site, obj);
        Ok(())
    }

    /// Object the identifier at `use_site` was bound to
    #[must_use]
    pub fn get(&self, use_site: usize) -> Option<ObjectId<Decl>> {
        self.by_use.get(&use_site).copied()
    }

    /// Number of bound use sites
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_use.len()
    }

    /// Whether nothing was bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_use.is_empty()
    }
}

/// A universe plus the packages loaded into it
pub struct World {
    /// Interner shared with the tree
    pub interner: Interner,
    /// The scope tree under test
    pub tree: ScopeTree<Decl>,
    /// Root scope holding the predeclared objects
    pub universe: ScopeId,
    packages: Vec<(Package, ScopeId)>,
}

impl World {
    /// Creates a world whose universe holds the predeclared objects
    ///
    /// # Errors
    ///
    /// Returns an error if a predeclared name is listed twice
    pub fn new() -> Result<Self> {
        let interner = Interner::new();
        Self::with_tree(ScopeTree::new(interner.clone()), interner)
    }

    /// Like [`World::new`], with a caller-configured tree
    ///
    /// # Errors
    ///
    /// Returns an error if a predeclared name is listed twice
    pub fn with_tree(mut tree: ScopeTree<Decl>, interner: Interner) -> Result<Self> {
        init_tracing();
        let universe = tree.new_scope(None, ScopeKind::Universe);

        let predeclared = PREDECLARED_TYPES
            .iter()
            .map(|&name| (name, ObjectKind::TypeName))
            .chain(PREDECLARED_CONSTS.iter().map(|&name| (name, ObjectKind::Const)))
            .chain(BUILTINS.iter().map(|&name| (name, ObjectKind::Builtin)))
            .chain([("nil", ObjectKind::Nil)]);
        for (name, kind) in predeclared {
            let decl = Decl {
                name: interner.intern(name),
                pkg: None,
                kind,
                imported: None,
            };
            if tree.declare(universe, decl).is_err() {
                bail!("predeclared {name} listed twice");
            }
        }

        Ok(Self {
            interner,
            tree,
            universe,
            packages: Vec::new(),
        })
    }

    /// Interns `name`
    pub fn sym(&self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    /// Package identity for an import path, named after its last segment
    pub fn package(&self, path: &str) -> Package {
        let name = path.rsplit('/').next().unwrap_or(path);
        Package::new(self.interner.intern(path), self.interner.intern(name))
    }

    /// Creates a package scope under the universe and declares `decls` in it
    ///
    /// # Errors
    ///
    /// Returns an error if `decls` contains a redeclaration
    pub fn new_package(&mut self, path: &str, decls: &[(&str, ObjectKind)]) -> Result<Package> {
        let pkg = self.package(path);
        let scope = self.tree.new_scope(Some(self.universe), ScopeKind::Package);
        self.packages.push((pkg, scope));
        for &(name, kind) in decls {
            self.declare(scope, pkg, name, kind)?;
        }
        Ok(pkg)
    }

    /// Scope of a loaded package
    ///
    /// # Errors
    ///
    /// Returns an error if no package with that path was created
    pub fn package_scope(&self, pkg: &Package) -> Result<ScopeId> {
        self.packages
            .iter()
            .find(|(loaded, _)| loaded.same_path(pkg))
            .map(|&(_, scope)| scope)
            .ok_or_else(|| anyhow!("package {} not loaded", self.interner.resolve(pkg.path())))
    }

    /// Declares `name` in `scope` on behalf of `pkg`
    ///
    /// # Errors
    ///
    /// Returns an error if `scope` already declares the same identifier
    pub fn declare(
        &mut self,
        scope: ScopeId,
        pkg: Package,
        name: &str,
        kind: ObjectKind,
    ) -> Result<ObjectId<Decl>> {
        let decl = Decl {
            name: self.interner.intern(name),
            pkg: Some(pkg),
            kind,
            imported: None,
        };
        self.tree.declare(scope, decl).map_err(|existing| {
            anyhow!(
                "{name} redeclared in this block (previous declaration is a {})",
                self.tree.object(existing).kind
            )
        })
    }

    /// Creates a file scope inside `pkg`'s package scope
    ///
    /// # Errors
    ///
    /// Returns an error if the package was not created
    pub fn file_scope(&mut self, pkg: &Package) -> Result<ScopeId> {
        let package = self.package_scope(pkg)?;
        Ok(self.tree.new_scope(Some(package), ScopeKind::File))
    }

    /// Binds an import of `path` into `file` under its package name or `alias`
    ///
    /// # Errors
    ///
    /// Returns an error if the package is not loaded or the name is already taken
    pub fn import(
        &mut self,
        file: ScopeId,
        importer: Package,
        path: &str,
        alias: Option<&str>,
    ) -> Result<ObjectId<Decl>> {
        let imported = self.package(path);
        let scope = self.package_scope(&imported)?;
        let name = match alias {
            Some(alias) => self.interner.intern(alias),
            None => imported.name(),
        };
        let decl = Decl {
            name,
            pkg: Some(importer),
            kind: ObjectKind::PkgName,
            imported: Some(scope),
        };
        self.tree.declare(file, decl).map_err(|_| {
            anyhow!("{} redeclared in this block", self.interner.resolve(name))
        })
    }

    /// Binds every exported object of `path` directly into `file`
    ///
    /// Returns how many objects were bound. The objects stay owned by their
    /// package scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the package is not loaded or a name is already taken
    pub fn dot_import(&mut self, file: ScopeId, path: &str) -> Result<usize> {
        let scope = self.package_scope(&self.package(path))?;
        let exported: Vec<_> = self
            .tree
            .scope(scope)
            .entries()
            .filter(|&obj| is_exported(self.tree.object_name(obj)))
            .collect();

        for &obj in &exported {
            if self.tree.insert(file, obj).is_some() {
                bail!("{} redeclared in this block", self.tree.object_name(obj));
            }
        }
        Ok(exported.len())
    }

    /// Resolves an unqualified identifier used in `scope`
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<ObjectId<Decl>> {
        let sym = self.interner.get(name)?;
        self.tree.scope(scope).lookup_parent(sym)
    }

    /// Resolves `qualifier.selector` used in `scope` while checking `current`
    ///
    /// # Errors
    ///
    /// Returns an error if the qualifier is undefined or not a package, or the
    /// selected name is not visible from `current`
    pub fn resolve_selector(
        &self,
        scope: ScopeId,
        current: &Package,
        qualifier: &str,
        selector: &str,
    ) -> Result<ObjectId<Decl>> {
        let qual = self
            .resolve(scope, qualifier)
            .ok_or_else(|| anyhow!("undefined: {qualifier}"))?;
        let Some(imported) = self.tree.object(qual).imported else {
            bail!("{qualifier} is not a package");
        };
        self.interner
            .get(selector)
            .and_then(|sym| self.tree.scope(imported).lookup(Some(current), sym))
            .ok_or_else(|| {
                anyhow!("{qualifier}.{selector} undefined (not declared or not exported)")
            })
    }
}
