//! Engine-level scenarios exercised directly against the watched-literal
//! machinery and the public `Solver` facade, independent of the dependency
//! domain.

use depsolve::sat::analyze::analyze;
use depsolve::sat::clause::ClauseDb;
use depsolve::sat::engine::Solver;
use depsolve::sat::lit::{Lit, Var};
use depsolve::sat::propagate::{propagate, PropagateResult};
use depsolve::sat::trail::{Reason, Trail};
use depsolve::sat::watch::WatchLists;

fn setup(n: u32) -> (Trail, ClauseDb, WatchLists) {
    let mut trail = Trail::new();
    let mut watches = WatchLists::new();
    for i in 1..=n {
        trail.expand(Var::new(i));
        watches.expand(Lit::new(i as i32));
        watches.expand(Lit::new(-(i as i32)));
    }
    (trail, ClauseDb::new(), watches)
}

fn insert(clauses: &mut ClauseDb, watches: &mut WatchLists, raw: &[i32]) {
    let lits: Vec<Lit> = raw.iter().map(|&r| Lit::new(r)).collect();
    let id = clauses.insert(lits.clone(), false, None);
    watches.add(lits[0], id);
    watches.add(lits[1], id);
}

/// A multi-level propagation chain through eight clauses over nineteen
/// variables: three prior decisions plus three facts already on the trail,
/// then one more decision triggers a cascade of eight forced literals with
/// no conflict. The watched-literal scheme is free to discover these in any
/// order, so only the resulting set (not the sequence) is checked.
#[test]
fn propagation_cascades_through_several_clauses_without_conflict() {
    let (mut trail, mut clauses, mut watches) = setup(19);
    insert(&mut clauses, &mut watches, &[-12, 6, -11]);
    insert(&mut clauses, &mut watches, &[16, -11, 13]);
    insert(&mut clauses, &mut watches, &[-2, 12, -16]);
    insert(&mut clauses, &mut watches, &[-10, -4, 2]);
    insert(&mut clauses, &mut watches, &[1, -8, 10]);
    insert(&mut clauses, &mut watches, &[3, 10]);
    insert(&mut clauses, &mut watches, &[-5, 10]);
    insert(&mut clauses, &mut watches, &[18, 17, -1, -3, 5]);

    trail.assign(Lit::new(-6), Reason::Decision);
    trail.assign(Lit::new(8), Reason::Decision);
    trail.assign(Lit::new(4), Reason::Decision);
    trail.assign(Lit::new(-17), Reason::Axiom);
    trail.assign(Lit::new(-13), Reason::Axiom);
    trail.assign(Lit::new(19), Reason::Axiom);

    let mut cursor = 0;
    assert!(matches!(
        propagate(&mut trail, &mut clauses, &mut watches, &mut cursor),
        PropagateResult::Ok
    ));

    trail.assign(Lit::new(11), Reason::Decision);
    let result = propagate(&mut trail, &mut clauses, &mut watches, &mut cursor);
    assert!(matches!(result, PropagateResult::Ok));

    let tail: std::collections::HashSet<i32> = (6..trail.len()).map(|i| trail.nth(i).to_i32()).collect();
    assert_eq!(
        tail,
        std::collections::HashSet::from([11, -12, 16, -2, -10, 1, 3, -5, 18])
    );
}

/// The same setup, plus one more clause that makes the cascade
/// self-contradictory: analysis should resolve back across the chain of
/// reason clauses to a single learned clause and a non-chronological
/// backjump past the decision that triggered the cascade.
#[test]
fn conflict_at_level_four_learns_a_clause_and_backjumps_to_level_three() {
    let (mut trail, mut clauses, mut watches) = setup(19);
    insert(&mut clauses, &mut watches, &[-12, 6, -11]);
    insert(&mut clauses, &mut watches, &[16, -11, 13]);
    insert(&mut clauses, &mut watches, &[-2, 12, -16]);
    insert(&mut clauses, &mut watches, &[-10, -4, 2]);
    insert(&mut clauses, &mut watches, &[1, -8, 10]);
    insert(&mut clauses, &mut watches, &[3, 10]);
    insert(&mut clauses, &mut watches, &[-5, 10]);
    insert(&mut clauses, &mut watches, &[18, 17, -1, -3, 5]);
    insert(&mut clauses, &mut watches, &[-18, -3, -19]);

    trail.assign(Lit::new(-6), Reason::Decision);
    trail.assign(Lit::new(8), Reason::Decision);
    trail.assign(Lit::new(4), Reason::Decision);
    trail.assign(Lit::new(-17), Reason::Axiom);
    trail.assign(Lit::new(-13), Reason::Axiom);
    trail.assign(Lit::new(19), Reason::Axiom);

    let mut cursor = 0;
    assert!(matches!(
        propagate(&mut trail, &mut clauses, &mut watches, &mut cursor),
        PropagateResult::Ok
    ));

    trail.assign(Lit::new(11), Reason::Decision);
    let conflict = match propagate(&mut trail, &mut clauses, &mut watches, &mut cursor) {
        PropagateResult::Conflict(cls) => cls,
        PropagateResult::Ok => panic!("expected the added clause to conflict"),
    };

    let (learned, backjump) = analyze(&trail, &clauses, conflict);
    let learned_ints: std::collections::HashSet<i32> = learned.iter().map(|l| l.to_i32()).collect();
    assert_eq!(
        learned_ints,
        std::collections::HashSet::from([-8, 10, 17, -19])
    );
    assert_eq!(learned[0], Lit::new(10));
    assert_eq!(backjump, 3);
}

/// A minimal two-clause conflict: deciding `-1` immediately forces `2`
/// (from `1 v 2`), which then conflicts with `1 v -2`. The only literal
/// common to both reasons at decision level 1 is `1` itself, so analysis
/// should produce the unit clause `{1}` and request a backjump to level 0.
#[test]
fn minimal_conflict_learns_a_unit_clause_and_backjumps_to_zero() {
    let (mut trail, mut clauses, mut watches) = setup(2);
    insert(&mut clauses, &mut watches, &[1, 2]);
    insert(&mut clauses, &mut watches, &[1, -2]);

    let mut cursor = 0;
    trail.assign(Lit::new(-1), Reason::Decision);
    let conflict = match propagate(&mut trail, &mut clauses, &mut watches, &mut cursor) {
        PropagateResult::Conflict(cls) => cls,
        PropagateResult::Ok => panic!("expected a conflict"),
    };

    let (learned, backjump) = analyze(&trail, &clauses, conflict);
    assert_eq!(learned, vec![Lit::new(1)]);
    assert_eq!(backjump, 0);
}

/// A unit input clause assigns its literal before search even starts.
#[test]
fn unit_clause_assigns_immediately() {
    let mut solver = Solver::new(1);
    solver.add_clause(&[-1]).unwrap();
    assert!(solver.solve().is_sat());
    assert_eq!(solver.trail().value(Lit::new(1)), Some(false));
}

/// An empty input clause can never be satisfied, so the solver reports
/// unsatisfiability without ever touching the trail.
#[test]
fn empty_clause_is_trivially_unsatisfiable() {
    let mut solver = Solver::new(3);
    solver.add_clause(&[]).unwrap();
    assert!(solver.trail().is_empty());
    let outcome = solver.solve();
    assert!(outcome.is_unsat());
    assert!(outcome.unwrap_unsat().is_none());
}

#[test]
fn solves_dimacs_input_end_to_end() {
    let mut solver = Solver::from_dimacs("p cnf 3 3\n1 2 0\n-1 3 0\n-2 -3 0\n").unwrap();
    assert!(solver.solve().is_sat());
}

#[test]
fn pigeonhole_is_unsatisfiable() {
    let mut solver = Solver::from_dimacs("p cnf 2 3\n1 0\n2 0\n-1 -2 0\n").unwrap();
    assert!(solver.solve().is_unsat());
}

#[test]
fn fixture_satisfiable_chain_is_sat() {
    let input = include_str!("fixtures/satisfiable_chain.cnf");
    let mut solver = Solver::from_dimacs(input).unwrap();
    assert!(solver.solve().is_sat());
}

#[test]
fn fixture_unsatisfiable_pigeonhole_is_unsat() {
    let input = include_str!("fixtures/unsatisfiable_pigeonhole.cnf");
    let mut solver = Solver::from_dimacs(input).unwrap();
    assert!(solver.solve().is_unsat());
}

#[test]
fn fixture_satisfiable_with_forced_unit_is_sat() {
    let input = include_str!("fixtures/satisfiable_with_forced_unit.cnf");
    let mut solver = Solver::from_dimacs(input).unwrap();
    assert!(solver.solve().is_sat());
    assert_eq!(solver.trail().value(Lit::new(1)), Some(false));
}
