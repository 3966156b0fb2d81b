//! Integration tests for the cross-package identity rule

use integration_tests::{Decl, World};
use lx_scope::{Interner, ObjectKind, Package, ScopeConfig, ScopeKind, ScopeTree};

fn decl(world: &World, name: &str, pkg: Option<Package>, kind: ObjectKind) -> Decl {
    Decl {
        name: world.sym(name),
        pkg,
        kind,
        imported: None,
    }
}

#[test]
fn test_same_spelling_from_different_packages() {
    let mut world = World::new().expect("universe");
    let pkg_a = world.package("example.com/a");
    let pkg_b = world.package("example.com/b");
    let third = world.package("example.com/c");
    let scope = world.tree.new_scope(Some(world.universe), ScopeKind::Package);

    let count_a = world.declare(scope, pkg_a, "count", ObjectKind::Var).expect("a.count");
    let count_b = world.declare(scope, pkg_b, "count", ObjectKind::Var).expect("b.count");
    let total_a = world.declare(scope, pkg_a, "Total", ObjectKind::Var).expect("a.Total");
    world
        .declare(scope, pkg_b, "Total", ObjectKind::Var)
        .expect_err("exported names collide across packages");

    let view = world.tree.scope(scope);
    let count = world.sym("count");
    let total = world.sym("Total");

    assert_eq!(view.lookup(Some(&third), count), None);
    assert_eq!(view.lookup(Some(&pkg_a), count), Some(count_a));
    assert_eq!(view.lookup(Some(&pkg_b), count), Some(count_b));
    assert_eq!(view.index(Some(&pkg_b), count), Some(1));

    for qualifier in [&pkg_a, &pkg_b, &third] {
        assert_eq!(view.lookup(Some(qualifier), total), Some(total_a));
    }

    // unqualified lookups see the first declaration in order
    assert_eq!(view.lookup(None, count), Some(count_a));
    assert_eq!(view.lookup_parent(count), Some(count_a));
    assert_eq!(view.num_entries(), 3);
}

#[test]
fn test_outer_exported_inner_unexported() {
    let mut world = World::new().expect("universe");
    let math = world.package("math");
    let pkg = world.package("p");
    let root = world.tree.new_scope(None, ScopeKind::Universe);
    let child = world.tree.new_scope(Some(root), ScopeKind::Package);

    let math_pi = decl(&world, "pi", Some(math), ObjectKind::Const);
    let p_pi = decl(&world, "pi", Some(pkg), ObjectKind::Const);
    let outer = world.tree.declare(root, math_pi).expect("math pi");
    let inner = world.tree.declare(child, p_pi).expect("p pi");

    let pi = world.sym("pi");
    assert_eq!(world.tree.scope(child).lookup_parent(pi), Some(inner));
    assert_eq!(world.tree.scope(root).lookup(Some(&pkg), pi), None);
    assert_eq!(world.tree.scope(root).lookup(Some(&math), pi), Some(outer));
    assert_eq!(world.tree.owner(inner), Some(child));
}

#[test]
fn test_repeated_insert_returns_first() {
    let mut world = World::new().expect("universe");
    let math = world.package("math");
    let root = world.tree.new_scope(None, ScopeKind::Universe);

    let first_pi = decl(&world, "pi", Some(math), ObjectKind::Const);
    let second_pi = decl(&world, "pi", Some(math), ObjectKind::Var);
    let first = world.tree.declare(root, first_pi).expect("first pi");
    let second = world.tree.alloc(second_pi);

    assert_eq!(world.tree.insert(root, second), Some(first));
    assert_eq!(world.tree.insert(root, second), Some(first));
    assert_eq!(world.tree.scope(root).num_entries(), 1);
    assert_eq!(world.tree.owner(second), None);
}

#[test]
fn test_indexed_and_linear_trees_agree() {
    let interner = Interner::new();
    let indexed: ScopeTree<Decl> = ScopeTree::with_config(
        interner.clone(),
        ScopeConfig::from_toml_str("name-index-threshold = 2").expect("config"),
    );
    let linear: ScopeTree<Decl> = ScopeTree::with_config(
        interner.clone(),
        ScopeConfig::from_toml_str("name-index-threshold = 0").expect("config"),
    );

    let mut results = Vec::new();
    for tree in [indexed, linear] {
        let mut world = World::with_tree(tree, interner.clone()).expect("universe");
        let pkg_a = world.package("a");
        let pkg_b = world.package("b");
        let scope = world.tree.new_scope(Some(world.universe), ScopeKind::Block);
        let mut conflicts = 0;
        for (i, name) in ["v", "w", "v", "V", "w", "x"].into_iter().enumerate() {
            let pkg = if i % 2 == 0 { pkg_a } else { pkg_b };
            if world.declare(scope, pkg, name, ObjectKind::Var).is_err() {
                conflicts += 1;
            }
        }
        // only the second `v` from package a collides
        assert_eq!(conflicts, 1);

        let view = world.tree.scope(scope);
        let probes: Vec<_> = ["v", "w", "V", "x", "len", "nil"]
            .into_iter()
            .map(|name| {
                let sym = world.sym(name);
                (
                    view.index(None, sym),
                    view.index(Some(&pkg_a), sym),
                    view.index(Some(&pkg_b), sym),
                    view.lookup_parent(sym).map(|obj| world.tree.object(obj).kind),
                )
            })
            .collect();
        results.push((view.num_entries(), probes, view.to_string()));
    }

    assert_eq!(results[0], results[1]);
    assert_eq!(results[0].0, 5);
}
