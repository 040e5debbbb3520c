//! The two equation solvers against each other and against the rule engine

use angle_solver_core::equations::{extract, parse_equation, simplify, HybridSolver, RrefSolver, VariableStatus};
use angle_solver_core::geometry::Relations;
use angle_solver_core::loader::load_diagrams;
use angle_solver_core::{
    solve, DiagramData, GeometryModel, LinearConfig, RuleEngine, SolveOptions, SolverConfig,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn all_fixtures() -> Vec<(String, DiagramData)> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut all = load_diagrams(root.join("diagrams"), false).unwrap();
    all.extend(load_diagrams(root.join("compact"), true).unwrap());
    assert!(all.len() >= 7);
    all
}

fn system_of(data: &DiagramData) -> (Vec<String>, Vec<String>) {
    let config = SolverConfig::default();
    let model = GeometryModel::from_diagram(data).unwrap();
    let relations = Relations::discover(&model, &config.tolerances, config.max_partitions);
    let system = simplify(&model, &relations, &extract(&model, &relations));
    let targets = model
        .targets()
        .filter_map(|a| system.symbol(&a.name).map(str::to_string))
        .collect();
    (system.equations, targets)
}

fn satisfies(equations: &[String], solution: &BTreeMap<String, f64>) -> bool {
    equations.iter().all(|text| {
        let equation = parse_equation(text).unwrap();
        let mut lhs = 0.0;
        for (variable, coefficient) in &equation.coefficients {
            match solution.get(variable) {
                Some(value) => lhs += coefficient * value,
                None => return true,
            }
        }
        (lhs - equation.constant).abs() < 1e-6
    })
}

#[test]
fn test_hybrid_and_rref_agree_on_unique_variables() {
    for (name, data) in all_fixtures() {
        let (equations, targets) = system_of(&data);
        let hybrid = HybridSolver::new(LinearConfig::default()).solve(&equations, &targets);
        let rref = RrefSolver::new(LinearConfig::default()).solve(&equations, &targets);

        for (variable, status) in &rref.variables {
            let (VariableStatus::Unique(value), Some(from_hybrid)) = (status, hybrid.solution.get(variable)) else {
                continue;
            };
            assert!(
                (from_hybrid - value).abs() < 1e-6,
                "{}: {} rref {} hybrid {}",
                name,
                variable,
                value,
                from_hybrid
            );
        }
        for target in &targets {
            assert_eq!(
                rref.report.solution.get(target).is_some(),
                matches!(rref.variables.get(target), Some(VariableStatus::Unique(_))),
                "{}: {}",
                name,
                target
            );
        }
    }
}

#[test]
fn test_solutions_satisfy_the_system() {
    for (name, data) in all_fixtures() {
        let (equations, targets) = system_of(&data);
        let hybrid = HybridSolver::new(LinearConfig::default()).solve(&equations, &targets);
        let rref = RrefSolver::new(LinearConfig::default()).solve(&equations, &targets);

        assert!(satisfies(&equations, &hybrid.solution), "{}: hybrid", name);
        assert!(satisfies(&equations, &rref.report.solution), "{}: rref", name);
    }
}

#[test]
fn test_rule_engine_values_satisfy_the_system() {
    for (name, data) in all_fixtures() {
        let config = SolverConfig::default();
        let mut model = GeometryModel::from_diagram(&data).unwrap();
        let relations = Relations::discover(&model, &config.tolerances, config.max_partitions);
        let system = simplify(&model, &relations, &extract(&model, &relations));
        let result = RuleEngine::new(config).run(&mut model, &relations);
        assert!(result.solved, "{}", name);

        let mut solution = BTreeMap::new();
        for angle in &model.angles {
            let (Some(value), Some(symbol)) = (angle.value, system.symbol(&angle.name)) else {
                continue;
            };
            // angles sharing a symbol must agree
            let previous = solution.insert(symbol.to_string(), value);
            assert!(previous.map_or(true, |p| (p - value).abs() < 1e-6), "{}: {}", name, symbol);
        }

        assert!(!solution.is_empty(), "{}", name);
        assert!(satisfies(&system.equations, &solution), "{}: {:?}", name, solution);
    }
}

#[test]
fn test_every_fixture_solves_without_disagreement() {
    for (name, data) in all_fixtures() {
        let result = solve(&data, SolveOptions::default());

        assert!(result.solved, "{} unsolved", name);
        assert!(result.theorems.solved, "{}: rule engine", name);
        assert!(result.hybrid.solved, "{}: hybrid", name);
        assert!(result.disagreements.is_empty(), "{}: {:?}", name, result.disagreements);
        for angle in data.angles.iter().filter(|a| a.target) {
            let value = result.value(&angle.id).unwrap();
            assert!(value > 0.0 && value <= 180.0, "{}: {} = {}", name, angle.id, value);
        }
    }
}
