//! End-to-end solves over the fixture diagrams

use angle_solver_core::loader::{load_compact, load_diagram};
use angle_solver_core::{solve, DiagramData, GeoAngle, SolveOptions};
use std::path::PathBuf;

fn fixture(kind: &str, name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(kind)
        .join(format!("{}.json", name))
}

fn diagram(name: &str) -> DiagramData {
    load_diagram(fixture("diagrams", name)).expect("fixture loads")
}

fn compact(name: &str) -> DiagramData {
    load_compact(fixture("compact", name)).expect("fixture loads")
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("angle has a value");
    assert!((actual - expected).abs() < 1e-6, "expected {}, got {}", expected, actual);
}

#[test]
fn test_triangle_third_angle() {
    let result = solve(&diagram("triangle_sum"), SolveOptions::default());

    assert!(result.solved);
    assert_close(result.value("c"), 70.0);
    assert!(result.disagreements.is_empty());
    assert_eq!(result.theorems.trace.steps[0].rule_id, "triangleSum");
}

#[test]
fn test_supplementary_on_a_line() {
    let result = solve(&diagram("supplementary"), SolveOptions::default());

    assert!(result.solved);
    assert_close(result.value("zyw"), 110.0);
}

#[test]
fn test_composed_angle_difference() {
    let result = solve(&diagram("composed"), SolveOptions::default());

    assert!(result.solved);
    assert_close(result.value("boc"), 50.0);
    assert_eq!(result.theorems.trace.steps[0].rule_id, "composed");
}

#[test]
fn test_isosceles_base_angles_from_circle() {
    let result = solve(&diagram("isosceles_circle"), SolveOptions::default());

    assert!(result.solved);
    assert_close(result.value("left"), 56.31);
    assert_close(result.value("right"), 56.31);
}

#[test]
fn test_chained_deduction() {
    let result = solve(&diagram("line_and_triangle"), SolveOptions::default());

    assert!(result.solved);
    assert_close(result.value("zyw"), 110.0);
    assert_close(result.value("zwy"), 30.0);
    assert_eq!(result.theorems.trace.len(), 2);
}

#[test]
fn test_mirror_cross_from_compact_file() {
    let result = solve(&compact("mirror"), SolveOptions::default());

    assert!(result.solved);
    assert_close(result.value("BOD"), 35.0);
    assert_close(result.value("COB"), 145.0);
    assert_close(result.value("DOA"), 145.0);
    assert!(result.disagreements.is_empty());
}

#[test]
fn test_labelled_halves() {
    let result = solve(&compact("labelled_fan"), SolveOptions::default());

    assert!(result.solved);
    assert_close(result.value("AOB"), 45.0);
    assert_close(result.value("BOC"), 45.0);
}

#[test]
fn test_iteration_cap_limits_the_rule_engine() {
    let result = solve(&diagram("line_and_triangle"), SolveOptions::default().with_max_iterations(1));

    assert!(result.theorems.iterations <= 1);
    // the equation strategies are not capped
    assert!(result.hybrid.solved);
    assert_close(result.value("zwy"), 30.0);
}

#[test]
fn test_set_angle_hook_sees_every_assignment() {
    let mut seen = Vec::new();
    let options = SolveOptions::default().with_set_angle(|angle: &GeoAngle, _reason: &str, rule: &str| {
        seen.push((angle.name.clone(), angle.value, rule.to_string()));
    });
    let result = solve(&diagram("line_and_triangle"), options);

    assert_eq!(seen.len(), result.theorems.trace.len());
    assert_eq!(seen[0], ("∠ZYW".to_string(), Some(110.0), "supplementary".to_string()));
    assert_eq!(seen[1].2, "triangleSum");
}

#[test]
fn test_solve_does_not_modify_input() {
    let data = diagram("line_and_triangle");
    let before = data.clone();
    solve(&data, SolveOptions::default());

    assert_eq!(data, before);
    assert!(data.angles.iter().filter(|a| a.target).all(|a| a.value.is_none()));
}

#[test]
fn test_result_serializes_to_json() {
    let result = solve(&diagram("triangle_sum"), SolveOptions::default());
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["solved"], true);
    assert_eq!(json["values"]["c"], 70.0);
    assert!(json["system"]["equations"].as_array().is_some_and(|e| !e.is_empty()));
}
