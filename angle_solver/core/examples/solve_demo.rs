//! Demonstration of a full solve
//!
//! Run with: cargo run --example solve_demo

use angle_solver_core::*;

fn main() {
    println!("=== Angle Solver Demo ===\n");

    // Line X-Y-W with Z above it; triangle Y-Z-W
    let t = 70f64.to_radians();
    let data = DiagramData::new()
        .point("X", -2.0, 0.0)
        .point("Y", 0.0, 0.0)
        .point("W", 2.0, 0.0)
        .point("Z", -1.555724 * t.cos(), 1.555724 * t.sin())
        .line("l1", &["X", "Y", "W"])
        .edge("Y", "Z")
        .edge("Z", "W")
        .angle(Angle::new("xyz", "Y", "X", "Z").with_value(70.0))
        .angle(Angle::new("zyw", "Y", "Z", "W"))
        .angle(Angle::new("yzw", "Z", "Y", "W").with_value(40.0))
        .angle(Angle::new("zwy", "W", "Z", "Y").as_target());

    let options = SolveOptions::default().with_set_angle(|angle: &GeoAngle, reason: &str, rule: &str| {
        println!("   [{}] {} = {:?} ({})", rule, angle.name, angle.value, reason);
    });

    println!("1. Rule engine assignments:");
    let results = solve(&data, options);

    println!("\n2. Simplified system:");
    for equation in &results.system.equations {
        println!("   {}", equation);
    }

    println!("\n3. Summary:");
    println!("   solved: {}", results.solved);
    println!("   score: {}", results.score);
    println!("   hybrid: {:?}", results.hybrid.solution);
    println!("   rref: {:?}", results.rref.classification);
    for (angle, value) in &results.values {
        println!("   {} = {}", angle, value);
    }

    let stats = results.theorems.trace.statistics();
    println!("\n4. Trace: {} steps, most used rule {:?}", stats.num_steps, stats.most_used_rule());
}
