use aptinfo::relationship_resolver::*;
use aptinfo::*;

fn init_logging() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn resolve(catalog: &Catalog, expression: &str) -> ResolverFinalized {
	let seeds = aptinfo::package::split_expression(expression)
		.map(|item| catalog.find_direct(&Clause::parse(item)).expect("seed not in catalog"));
	ResolverBuilder::new(catalog).add_seeds(seeds).build().resolve()
}

fn names(catalog: &Catalog, resolved: &ResolverFinalized) -> Vec<String> {
	resolved.display_order().map(|id| catalog[id].name().to_string()).collect()
}

const ARCHIVE: &str = "\
Package: app
Version: 1.0-1
Architecture: amd64
Depends: libc6 (>= 2.34), mail-transport-agent, python3 | python3-minimal
Size: 100
Installed-Size: 400

Package: libc6
Version: 2.36-9
Architecture: amd64
Depends: libgcc-s1
Size: 2000
Installed-Size: 12000

Package: libgcc-s1
Version: 12.2.0-14
Architecture: amd64
Depends: libc6 (>= 2.35)
Size: 50
Installed-Size: 140

Package: postfix
Version: 3.7.10-0+deb12u1
Architecture: amd64
Provides: mail-transport-agent
Depends: libc6
Size: 1500
Installed-Size: 4000

Package: python3
Version: 3.11.2-1+b1
Architecture: amd64
Size: 26
Installed-Size: 80
";

#[test]
fn resolve_dependency() {
	init_logging();
	let (_dir, catalog) = aptinfo_test_utils::load_catalog(&[ARCHIVE], None).unwrap();

	let resolved = resolve(&catalog, "app");
	assert_eq!(names(&catalog, &resolved), ["libgcc-s1", "postfix", "libc6", "app"]);
	/* python3 is never selected by the alternative on its own */
	assert_eq!(resolved.unresolved().len(), 1);
	assert_eq!(resolved.unresolved()[0].requirement, "[python3 | python3-minimal]");
}

#[test]
fn resolve_with_alternative_preselected() {
	init_logging();
	let (_dir, catalog) = aptinfo_test_utils::load_catalog(&[ARCHIVE], None).unwrap();

	let resolved = resolve(&catalog, "python3, app");
	assert_eq!(names(&catalog, &resolved), ["libgcc-s1", "postfix", "libc6", "app", "python3"]);
	assert!(resolved.unresolved().is_empty());
}

#[test]
fn alternative_members_are_still_resolvable_directly() {
	init_logging();
	let (_dir, catalog) = aptinfo_test_utils::load_catalog(&["Package: a\nDepends: b | c\n\nPackage: b\n"], None).unwrap();

	let resolved = resolve(&catalog, "b, a");
	assert_eq!(names(&catalog, &resolved), ["a", "b"]);
	assert!(resolved.unresolved().is_empty());

	let b = catalog.find_any(&Clause::parse("b")).unwrap();
	assert_eq!(catalog[b].name(), "b");
	assert_eq!(catalog.find_any(&Clause::parse("c")), None);
}

#[test]
fn provides_fallback() {
	init_logging();
	let (_dir, catalog) = aptinfo_test_utils::load_catalog(&["Package: p\nVersion: 1\nProvides: libx (= 2.0)\n"], None).unwrap();

	let found = catalog.find_any(&Clause::parse("libx (>= 1.0)")).unwrap();
	assert_eq!(catalog[found].name(), "p");
}

#[test]
fn cycle_safety() {
	init_logging();
	let (_dir, catalog) = aptinfo_test_utils::load_catalog(&["Package: A\nDepends: B\n\nPackage: B\nDepends: A\n"], None).unwrap();

	let resolved = resolve(&catalog, "A");
	assert_eq!(names(&catalog, &resolved), ["B", "A"]);
}

#[test]
fn resolve_across_files() {
	init_logging();
	let (_dir, catalog) = aptinfo_test_utils::load_catalog(&[
		"Package: a\nDepends: b (>> 1)\n",
		"Package: b\nVersion: 1\n\nPackage: b\nVersion: 2\n",
	], None).unwrap();

	let resolved = resolve(&catalog, "a");
	let b = resolved.discovery_order()[1];
	assert_eq!(catalog[b].version(), "2");
}
