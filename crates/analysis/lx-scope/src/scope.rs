//! Scope tree for name resolution

use crate::config::ScopeConfig;
use crate::object::{is_exported, Object, ObjectId};
use crate::package::Package;
use la_arena::{Arena, ArenaMap};
use lx_intern::{Interner, Symbol};
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::{debug, trace};

/// Unique identifier for a scope within one [`ScopeTree`]
///
/// Identifiers are handed out in creation order, so a parent always has a
/// smaller identifier than its children.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ScopeId(u32);

impl ScopeId {
    /// Raw index of this scope
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Lexical unit a scope was created for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Predeclared identifiers (root)
    Universe,
    /// Package-level declarations
    Package,
    /// Per-file imports
    File,
    /// Function parameters and results
    Function,
    /// Block (inside { })
    Block,
}

/// A single scope in the scope tree
#[derive(Debug, Clone)]
struct Scope<O> {
    parent: Option<ScopeId>,
    kind: ScopeKind,
    /// Declarations in insertion order; the source of truth for lookups
    entries: Vec<ObjectId<O>>,
    /// Positions in `entries` per name, ascending, once the scope is large enough
    names: Option<FxHashMap<Symbol, Vec<u32>>>,
}

impl<O: Object> Scope<O> {
    fn new(parent: Option<ScopeId>, kind: ScopeKind) -> Self {
        Self {
            parent,
            kind,
            entries: Vec::new(),
            names: None,
        }
    }

    /// Position of the first entry named `name` that also satisfies `accept`
    fn find(
        &self,
        objects: &Arena<O>,
        name: Symbol,
        mut accept: impl FnMut(&O) -> bool,
    ) -> Option<usize> {
        if let Some(names) = &self.names {
            return names
                .get(&name)?
                .iter()
                .map(|&pos| pos as usize)
                .find(|&pos| accept(&objects[self.entries[pos]]));
        }

        self.entries.iter().position(|&id| {
            let obj = &objects[id];
            obj.name() == name && accept(obj)
        })
    }

    fn push(&mut self, objects: &Arena<O>, obj: ObjectId<O>, config: &ScopeConfig) {
        let pos = self.entries.len() as u32;
        self.entries.push(obj);

        if let Some(names) = &mut self.names {
            names.entry(objects[obj].name()).or_default().push(pos);
        } else if config.wants_index(self.entries.len()) {
            let mut names: FxHashMap<Symbol, Vec<u32>> = FxHashMap::default();
            for (position, &id) in self.entries.iter().enumerate() {
                names.entry(objects[id].name()).or_default().push(position as u32);
            }
            debug!(entries = self.entries.len(), "scope switched to name index");
            self.names = Some(names);
        }
    }
}

/// Tree of scopes together with the objects declared in them
///
/// The tree owns every object it can bind. Objects are allocated with
/// [`ScopeTree::alloc`] and bound with [`ScopeTree::insert`]; the scope that first
/// binds an object is recorded as its owner and never changes afterwards.
///
/// Mutation needs `&mut self`, so a populated tree shared behind `&` or an `Arc`
/// is a frozen universe that any number of readers can use. Cloning gives each
/// compilation unit its own copy to extend.
#[derive(Clone)]
pub struct ScopeTree<O> {
    interner: Interner,
    config: ScopeConfig,
    scopes: Vec<Scope<O>>,
    objects: Arena<O>,
    /// Owning scope per object, written once
    owners: ArenaMap<ObjectId<O>, ScopeId>,
}

impl<O: Object> ScopeTree<O> {
    /// Creates an empty tree with the default configuration
    #[must_use]
    pub fn new(interner: Interner) -> Self {
        Self::with_config(interner, ScopeConfig::default())
    }

    /// Creates an empty tree with the given configuration
    #[must_use]
    pub fn with_config(interner: Interner, config: ScopeConfig) -> Self {
        Self {
            interner,
            config,
            scopes: Vec::new(),
            objects: Arena::new(),
            owners: ArenaMap::default(),
        }
    }

    /// Interner the tree's names were interned with
    #[must_use]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Creates a new, empty scope nested in `parent`
    ///
    /// `parent` must come from this tree. `None` creates a root scope.
    pub fn new_scope(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
        debug_assert!(
            parent.is_none_or(|id| id.index() < self.scopes.len()),
            "parent scope belongs to another tree"
        );
        let scope_id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(parent, kind));
        trace!(scope = scope_id.0, parent = ?parent.map(ScopeId::as_u32), ?kind, "new scope");
        scope_id
    }

    /// Number of scopes created so far
    #[must_use]
    pub fn num_scopes(&self) -> usize {
        self.scopes.len()
    }

    /// Read-only view of a scope; `None` gives a view of the absent scope
    ///
    /// The absent scope answers every query like an empty scope.
    #[must_use]
    pub fn scope(&self, scope: impl Into<Option<ScopeId>>) -> ScopeRef<'_, O> {
        let id = scope.into();
        ScopeRef {
            tree: self,
            id,
            data: id.map(|id| &self.scopes[id.index()]),
        }
    }

    /// Allocates an object without binding it anywhere
    pub fn alloc(&mut self, obj: O) -> ObjectId<O> {
        self.objects.alloc(obj)
    }

    /// Returns an object allocated in this tree
    #[must_use]
    pub fn object(&self, obj: ObjectId<O>) -> &O {
        &self.objects[obj]
    }

    /// Name of an object as a string
    #[must_use]
    pub fn object_name(&self, obj: ObjectId<O>) -> &str {
        self.interner.resolve(self.objects[obj].name())
    }

    /// Scope that first bound `obj`, if any
    #[must_use]
    pub fn owner(&self, obj: ObjectId<O>) -> Option<ScopeId> {
        self.owners.get(obj).copied()
    }

    /// Binds `obj` in `scope`
    ///
    /// If `scope` already holds an entry that is the same identifier as `obj`
    /// (`Lookup(obj.pkg(), obj.name())`), nothing changes and that entry is
    /// returned. Otherwise `obj` is appended, `scope` becomes its owner unless it
    /// already had one, and the result is `None`.
    pub fn insert(&mut self, scope: ScopeId, obj: ObjectId<O>) -> Option<ObjectId<O>> {
        let (name, pkg) = {
            let object = &self.objects[obj];
            (object.name(), object.pkg().copied())
        };

        if let Some(existing) = self.scope(scope).lookup(pkg.as_ref(), name) {
            debug!(
                scope = scope.0,
                name = self.interner.resolve(name),
                "already declared in scope"
            );
            return Some(existing);
        }

        self.scopes[scope.index()].push(&self.objects, obj, &self.config);
        if self.owners.get(obj).is_none() {
            self.owners.insert(obj, scope);
        }
        trace!(scope = scope.0, name = self.interner.resolve(name), "inserted");
        None
    }

    /// Allocates `obj` and binds it in `scope`
    ///
    /// # Errors
    ///
    /// Returns the already-declared object if `scope` holds the same identifier.
    /// The rejected object stays allocated but unbound.
    pub fn declare(&mut self, scope: ScopeId, obj: O) -> Result<ObjectId<O>, ObjectId<O>> {
        let id = self.alloc(obj);
        self.insert(scope, id).map_or(Ok(id), Err)
    }
}

/// Read-only view of a scope, or of the absent scope
pub struct ScopeRef<'tree, O> {
    tree: &'tree ScopeTree<O>,
    id: Option<ScopeId>,
    data: Option<&'tree Scope<O>>,
}

impl<O> Clone for ScopeRef<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O> Copy for ScopeRef<'_, O> {}

impl<'tree, O: Object> ScopeRef<'tree, O> {
    /// Identifier of the viewed scope, `None` for the absent scope
    #[must_use]
    pub fn id(&self) -> Option<ScopeId> {
        self.id
    }

    /// Containing scope
    #[must_use]
    pub fn parent(&self) -> Option<ScopeId> {
        self.data.and_then(|scope| scope.parent)
    }

    /// Lexical unit the scope was created for
    #[must_use]
    pub fn kind(&self) -> Option<ScopeKind> {
        self.data.map(|scope| scope.kind)
    }

    /// Number of entries
    #[must_use]
    pub fn num_entries(&self) -> usize {
        self.data.map_or(0, |scope| scope.entries.len())
    }

    /// Whether the scope has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_entries() == 0
    }

    /// The `i`'th entry in insertion order, `None` if out of range
    #[must_use]
    pub fn at(&self, i: usize) -> Option<ObjectId<O>> {
        self.data.and_then(|scope| scope.entries.get(i).copied())
    }

    /// Entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = ObjectId<O>> + use<'tree, O> {
        let entries: &'tree [ObjectId<O>] = self
            .data
            .map_or(&[][..], |scope| scope.entries.as_slice());
        entries.iter().copied()
    }

    /// Position of the entry that is the same identifier as (`pkg`, `name`)
    ///
    /// With `pkg == None` only the name is compared. Otherwise an entry matches
    /// if it has the same name and either the name is exported or the entry was
    /// declared in a package with the same path as `pkg`. Parent scopes are not
    /// searched.
    #[must_use]
    pub fn index(&self, pkg: Option<&Package>, name: Symbol) -> Option<usize> {
        let scope = self.data?;
        let objects = &self.tree.objects;

        let Some(pkg) = pkg else {
            return scope.find(objects, name, |_| true);
        };

        let exported = self.tree.interner.try_resolve(name).is_some_and(is_exported);
        scope.find(objects, name, |obj| {
            exported || obj.pkg().is_some_and(|origin| origin.same_path(pkg))
        })
    }

    /// The entry at [`ScopeRef::index`], if any
    #[must_use]
    pub fn lookup(&self, pkg: Option<&Package>, name: Symbol) -> Option<ObjectId<O>> {
        let i = self.index(pkg, name)?;
        self.at(i)
    }

    /// Innermost binding of `name` visible from this scope
    #[must_use]
    pub fn lookup_parent(&self, name: Symbol) -> Option<ObjectId<O>> {
        self.resolve(name).map(|(_, obj)| obj)
    }

    /// Like [`ScopeRef::lookup_parent`], also returning the scope the binding lives in
    #[must_use]
    pub fn resolve(&self, name: Symbol) -> Option<(ScopeId, ObjectId<O>)> {
        self.ancestors().find_map(|scope| {
            let obj = scope.lookup(None, name)?;
            Some((scope.id?, obj))
        })
    }

    /// This scope followed by each enclosing scope up to the root
    #[must_use]
    pub fn ancestors(&self) -> Ancestors<'tree, O> {
        Ancestors {
            tree: self.tree,
            next: self.id,
        }
    }
}

impl<O: Object> fmt::Display for ScopeRef<'_, O> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(id), Some(scope)) = (self.id, self.data) else {
            return formatter.write_str("scope {}");
        };

        write!(formatter, "scope {id} {{")?;
        if !scope.entries.is_empty() {
            writeln!(formatter)?;
            for &obj in &scope.entries {
                let object = &self.tree.objects[obj];
                writeln!(
                    formatter,
                    "\t{}\t{}",
                    self.tree.interner.try_resolve(object.name()).unwrap_or("?"),
                    object.kind()
                )?;
            }
        }
        writeln!(formatter, "}}")
    }
}

/// Iterator over a scope and its ancestors, innermost first
///
/// Parents always have smaller identifiers than their children, so the walk
/// ends after at most as many steps as the tree has scopes.
pub struct Ancestors<'tree, O> {
    tree: &'tree ScopeTree<O>,
    next: Option<ScopeId>,
}

impl<'tree, O: Object> Iterator for Ancestors<'tree, O> {
    type Item = ScopeRef<'tree, O>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.tree.scope(self.next?);
        self.next = current.parent();
        Some(current)
    }
}
