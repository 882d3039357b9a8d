//! End-to-end scenarios through the public dependency resolution API: pool
//! construction, rule generation and the CDCL engine together.

use depsolve::domain::{
    DependencySolver, Operation, Package, Repository, Request, Requirement, ResolveError,
    SolveOptions, Version,
};

#[test]
fn simple_install_picks_the_newest_transitive_dependency() {
    let mut remote = Repository::new();
    remote.add(Package::new("app", Version::new(1, 0, 0)).depends_on(Requirement::any("lib")));
    remote.add(Package::new("lib", Version::new(1, 0, 0)));
    remote.add(Package::new("lib", Version::new(2, 0, 0)));

    let solver = DependencySolver::new(&[remote], &Repository::new(), SolveOptions::default());
    let transaction = solver
        .solve(&Request::new().install(Requirement::any("app")))
        .expect("satisfiable");

    let installed: Vec<String> = transaction
        .operations()
        .iter()
        .filter_map(|op| match op {
            Operation::Install(id) => Some(solver.pool().package(*id).name.clone()),
            _ => None,
        })
        .collect();
    assert!(installed.contains(&"app".to_string()));
    assert!(installed.contains(&"lib".to_string()));

    let lib_version = transaction
        .operations()
        .iter()
        .find_map(|op| match op {
            Operation::Install(id) if solver.pool().package(*id).name == "lib" => {
                Some(solver.pool().package(*id).version)
            }
            _ => None,
        })
        .expect("lib was installed");
    assert_eq!(lib_version, Version::new(2, 0, 0));
}

#[test]
fn conflicting_packages_cannot_both_be_requested() {
    let mut remote = Repository::new();
    remote.add(Package::new("a", Version::new(1, 0, 0)).conflicts_with(Requirement::any("b")));
    remote.add(Package::new("b", Version::new(1, 0, 0)));

    let solver = DependencySolver::new(&[remote], &Repository::new(), SolveOptions::default());
    let request = Request::new().install(Requirement::any("a")).install(Requirement::any("b"));
    let err = solver.solve(&request).unwrap_err();
    assert!(matches!(err, ResolveError::Unsatisfiable(_)));
}

#[test]
fn mutually_dependent_packages_install_together() {
    let mut remote = Repository::new();
    remote.add(Package::new("a", Version::new(1, 0, 0)).depends_on(Requirement::any("b")));
    remote.add(Package::new("b", Version::new(1, 0, 0)).depends_on(Requirement::any("a")));

    let solver = DependencySolver::new(&[remote], &Repository::new(), SolveOptions::default());
    let transaction = solver
        .solve(&Request::new().install(Requirement::any("a")))
        .expect("a cycle between two otherwise-unconstrained packages is satisfiable");

    let names: Vec<&str> = transaction
        .operations()
        .iter()
        .filter_map(|op| match op {
            Operation::Install(id) => Some(solver.pool().package(*id).name.as_str()),
            _ => None,
        })
        .collect();
    assert!(names.contains(&"a"));
    assert!(names.contains(&"b"));
}

#[test]
fn naming_one_package_for_upgrade_leaves_the_others_untouched() {
    let mut remote = Repository::new();
    remote.add(Package::new("a", Version::new(2, 0, 0)));
    remote.add(Package::new("b", Version::new(2, 0, 0)));
    let mut installed = Repository::new();
    installed.add(Package::new("a", Version::new(1, 0, 0)));
    installed.add(Package::new("b", Version::new(1, 0, 0)));

    let solver = DependencySolver::new(&[remote], &installed, SolveOptions::default());
    let request = Request::new().upgrade(Requirement::any("a"));
    let transaction = solver.solve(&request).expect("satisfiable");

    assert_eq!(transaction.operations().len(), 1);
    match transaction.operations()[0] {
        Operation::Update { from, to } => {
            assert_eq!(solver.pool().package(from).name, "a");
            assert_eq!(solver.pool().package(to).version, Version::new(2, 0, 0));
        }
        other => panic!("expected a single Update for `a`, got {other:?}"),
    }
}

#[test]
fn unsatisfiable_install_against_a_conflicting_installed_package_carries_an_explanation() {
    let mut installed = Repository::new();
    installed.add(Package::new("a", Version::new(1, 0, 0)));
    let mut remote = Repository::new();
    remote.add(Package::new("b", Version::new(1, 0, 0)).conflicts_with(Requirement::any("a")));

    let solver = DependencySolver::new(&[remote], &installed, SolveOptions::default());
    let request = Request::new().install(Requirement::any("b"));
    match solver.solve(&request).unwrap_err() {
        ResolveError::Unsatisfiable(Some(explanation)) => {
            // The root of the proof is the decision-level-0 conflict itself;
            // whatever unit forced one side of it should show up as a child.
            let _ = explanation.tree.clause;
            let _ = explanation.pool.len();
        }
        other => panic!("expected an explained conflict, got {other:?}"),
    }
}
