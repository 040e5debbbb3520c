//! Angle solver CLI
//!
//! `angle-solve solve <file>` solves a diagram and prints the target values;
//! `angle-solve equations <file>` prints the extracted and simplified system.

use angle_solver_core::equations::{extract, simplify};
use angle_solver_core::geometry::Relations;
use angle_solver_core::loader::{load_compact, load_diagram};
use angle_solver_core::{solve, DiagramData, GeometryModel, SolveOptions, SolverConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "angle-solve")]
#[command(about = "Solve unknown angles in geometry diagrams")]
struct Cmd {
    /// Log every assignment and rejected proposal
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve the target angles of a diagram
    Solve {
        file: PathBuf,
        /// Input uses the compact persisted schema
        #[arg(long)]
        compact: bool,
        /// Solver configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print raw and simplified equations
    Equations {
        file: PathBuf,
        #[arg(long)]
        compact: bool,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cmd.action {
        Action::Solve { file, compact, config, max_iterations, json } => {
            run_solve(&file, compact, config.as_deref(), max_iterations, json)
        }
        Action::Equations { file, compact, config } => run_equations(&file, compact, config.as_deref()),
    }
}

fn load(file: &Path, compact: bool) -> Result<DiagramData> {
    let data = if compact { load_compact(file) } else { load_diagram(file) };
    data.with_context(|| format!("loading {}", file.display()))
}

fn load_config(path: Option<&Path>) -> Result<SolverConfig> {
    match path {
        Some(path) => SolverConfig::from_json_file(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(SolverConfig::default()),
    }
}

fn run_solve(file: &Path, compact: bool, config: Option<&Path>, max_iterations: Option<usize>, json: bool) -> Result<()> {
    let data = load(file, compact)?;
    let mut options = SolveOptions::new(load_config(config)?);
    if let Some(max) = max_iterations {
        options = options.with_max_iterations(max);
    }
    let results = solve(&data, options);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("solved: {} (score {}, {:.2} ms)", results.solved, results.score, results.execution_time_ms);
    for angle in data.angles.iter().filter(|a| a.target) {
        let name = format!("∠{}{}{}", angle.sidepoints[0], angle.point_id, angle.sidepoints[1]);
        match results.value(&angle.id) {
            Some(value) => println!("  {} = {}", name, value),
            None => println!("  {} = ?", name),
        }
    }
    for step in &results.theorems.trace.steps {
        tracing::debug!(angle = %step.angle_name, value = step.value, rule = %step.rule_id, reason = %step.reason, "step");
    }
    for d in &results.disagreements {
        println!("  disagreement on {}: rules {} vs {} {}", d.name, d.theorem, d.strategy, d.equation);
    }
    Ok(())
}

fn run_equations(file: &Path, compact: bool, config: Option<&Path>) -> Result<()> {
    let data = load(file, compact)?;
    let config = load_config(config)?;
    let model = GeometryModel::from_diagram(&data).context("building geometry model")?;
    let relations = Relations::discover(&model, &config.tolerances, config.max_partitions);
    let equations = extract(&model, &relations);
    let system = simplify(&model, &relations, &equations);

    println!("equations ({}):", equations.len());
    for equation in &equations {
        println!("  {}", equation.render(&model));
    }
    println!("simplified ({}):", system.equations.len());
    for equation in &system.equations {
        println!("  {}", equation);
    }
    println!("symbols:");
    for (symbol, names) in &system.symbol_to_names {
        println!("  {} = {}", symbol, names.join(", "));
    }
    Ok(())
}
