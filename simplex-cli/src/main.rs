//! Command-line front end for the simplex LP/MILP solver.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use simplex_core::{analysis, parse, sensitivity, solve, SolveStatus, SolverOptions};
use simplex_mip::{solve_branch_and_bound, solve_cutting_plane, MipSettings, MipStatus};

#[derive(Parser)]
#[command(name = "simplex", about = "Solve a linear or mixed-integer program from a model file")]
struct Args {
    /// Model file in the line-oriented text format.
    file: PathBuf,

    /// Solving method for integer models.
    #[arg(long, value_enum, default_value_t = Method::Auto)]
    method: Method,

    /// Pivot iteration cap per relaxation solve.
    #[arg(long, default_value_t = 1000)]
    max_iterations: usize,

    /// Deadline in milliseconds.
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Log every pivot (RUST_LOG=info).
    #[arg(long)]
    show_steps: bool,

    /// Print shadow prices and ranging information at the optimum.
    #[arg(long)]
    sensitivity: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Branch-and-bound when integer variables are present, plain simplex
    /// otherwise.
    Auto,
    /// Continuous relaxation only.
    Simplex,
    /// Best-first branch-and-bound.
    BranchBound,
    /// Iterative cutting planes.
    CuttingPlane,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    let model = parse::parse_model(&text).context("cannot parse model")?;

    let mut options = SolverOptions::default()
        .with_max_iterations(args.max_iterations)
        .with_show_steps(args.show_steps);
    options.time_limit_ms = args.time_limit_ms;

    let has_integers = !model.integer_vars().is_empty();
    let method = match args.method {
        Method::Auto if has_integers => Method::BranchBound,
        Method::Auto => Method::Simplex,
        chosen => chosen,
    };

    match method {
        Method::Simplex | Method::Auto => {
            let result = solve(&model, &options)?;
            println!("status    : {}", result.status);
            if result.status == SolveStatus::Optimal {
                print_assignment(&result.assignment);
                println!("objective : {:.6}", result.objective);

                if let Some(snapshot) = &result.snapshot {
                    let character = analysis::characterize(snapshot, options.tolerance);
                    if character.degenerate {
                        println!("note      : degenerate basis; Bland's rule recommended");
                    }
                    if character.alternate_optima {
                        println!("note      : alternate optimal solutions exist");
                    }
                    if args.sensitivity {
                        print_sensitivity(snapshot, &model);
                    }
                }
            } else if result.status == SolveStatus::Unbounded {
                if let Some(ray) = result.snapshot.as_ref().and_then(analysis::extreme_ray) {
                    println!("ray       : {:?}", ray);
                }
            }
        }
        Method::BranchBound | Method::CuttingPlane => {
            let mut settings = MipSettings::default();
            settings.time_limit_ms = args.time_limit_ms;
            settings.relaxation = options;
            let solution = if method == Method::BranchBound {
                solve_branch_and_bound(&model, &settings)?
            } else {
                solve_cutting_plane(&model, &settings)?
            };

            println!("status    : {:?}", solution.status);
            if solution.status == MipStatus::Optimal {
                print_assignment(&solution.assignment);
                println!("objective : {:.6}", solution.objective);
            }
            println!(
                "explored  : {} nodes/rounds, {} cuts{}",
                solution.nodes_explored,
                solution.cuts_added,
                if solution.truncated { " (truncated)" } else { "" }
            );
        }
    }

    Ok(())
}

fn print_assignment(x: &[f64]) {
    for (i, v) in x.iter().enumerate() {
        println!("x{:<3}      : {:.6}", i + 1, v);
    }
}

fn print_sensitivity(snapshot: &simplex_core::TableauSnapshot, model: &simplex_core::Model) {
    println!("-- sensitivity --");
    let prices = sensitivity::shadow_prices(snapshot, model);
    let rhs = sensitivity::rhs_ranges(snapshot, model);
    for (i, (price, range)) in prices.iter().zip(&rhs).enumerate() {
        match (price, range) {
            (Some(p), Some(r)) => println!(
                "row {:<3}   : shadow price {:.6}, rhs range [{:.6}, {:.6}]",
                i + 1,
                p,
                r.lower,
                r.upper
            ),
            _ => println!("row {:<3}   : (equality or redundant row)", i + 1),
        }
    }
    for (j, range) in sensitivity::cost_ranges(snapshot, model).iter().enumerate() {
        println!(
            "c{:<3}      : cost range [{:.6}, {:.6}]",
            j + 1,
            range.lower,
            range.upper
        );
    }
}
