use clap::{Parser, Subcommand};
use rp_app::{
    AppError, AppResult, DEFAULT_FD_STEP, RunMode, RunOptions, RunProgressEvent, RunRequest,
    RunResponse, RunStage,
};
use rp_solver::{Gradient, OperatingPoint, SolverKind, SweepPoint};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "rp-cli")]
#[command(about = "rotorperf CLI - blade element momentum rotor performance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a case file and build its rotor
    Validate {
        /// Path to the case file (.yaml, .yml or .json)
        case_path: PathBuf,
    },
    /// Solve the case's operating points, or a single given point
    Run {
        case_path: PathBuf,
        /// Section solver: robust or newton (defaults to the case's choice)
        #[arg(long)]
        solver: Option<SolverKind>,
        /// Freestream speed [m/s]; requires --rpm
        #[arg(long, requires = "rpm")]
        v_inf: Option<f64>,
        /// Rotational speed [rev/min]; requires --v-inf
        #[arg(long, requires = "v_inf")]
        rpm: Option<f64>,
        /// Print full records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the case's sweep and print or write a CSV table
    Sweep {
        case_path: PathBuf,
        #[arg(long)]
        solver: Option<SolverKind>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Analytic sensitivities with a finite-difference check
    Sensitivities {
        case_path: PathBuf,
        #[arg(long)]
        v_inf: f64,
        #[arg(long)]
        rpm: f64,
        /// Relative finite-difference step
        #[arg(long, default_value_t = DEFAULT_FD_STEP)]
        step: f64,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Run {
            case_path,
            solver,
            v_inf,
            rpm,
            json,
        } => {
            let point = match (v_inf, rpm) {
                (Some(v), Some(n)) => Some(OperatingPoint::new(v, n)),
                _ => None,
            };
            cmd_run(&case_path, RunOptions { solver, point }, json)
        }
        Commands::Sweep {
            case_path,
            solver,
            output,
        } => cmd_sweep(&case_path, solver, output.as_deref()),
        Commands::Sensitivities {
            case_path,
            v_inf,
            rpm,
            step,
        } => cmd_sensitivities(&case_path, v_inf, rpm, step),
    }
}

fn cmd_validate(case_path: &Path) -> AppResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = rp_app::load_case(case_path)?;
    let compiled = rp_app::compile_case(&case)?;
    println!("✓ Case is valid");
    println!("{}", rp_app::summarize(&compiled));
    Ok(())
}

fn run_with_progress(request: &RunRequest) -> AppResult<RunResponse> {
    let mut last_emit = Instant::now();
    let mut last_stage = RunStage::LoadingCase;
    let response = rp_app::run_case_with_progress(
        request,
        Some(&mut |event| {
            let emit_now =
                event.stage != last_stage || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = event.stage;
                last_emit = Instant::now();
            }
        }),
    );
    clear_progress_line();
    response
}

fn cmd_run(case_path: &Path, options: RunOptions, json: bool) -> AppResult<()> {
    let request = RunRequest {
        case_path,
        mode: RunMode::Points,
        options,
    };
    let response = run_with_progress(&request)?;

    println!(
        "✓ {} ({} solver, {:.3}s)",
        response.case_name, response.solver, response.timing.total_time_s
    );
    for point in &response.points {
        match point {
            SweepPoint::Solved(record) if json => println!("{}", rp_app::record_json(record)?),
            SweepPoint::Solved(r) => {
                println!(
                    "  v_inf={:>8.3} m/s  rpm={:>8.1}  T={:>10.3} N  Q={:>10.3} N·m  P={:>11.2} W",
                    r.v_inf, r.rpm, r.thrust, r.torque, r.power
                );
                println!(
                    "      J={:.4}  CT={:.5}  CQ={:.6}  CP={:.5}  FM={:.4}  eta={:.4}",
                    r.j(),
                    r.ct(),
                    r.cq(),
                    r.cp(),
                    r.fm(),
                    r.eta()
                );
            }
            SweepPoint::Failed { point, error } => {
                println!(
                    "  v_inf={:>8.3} m/s  rpm={:>8.1}  FAILED: {}",
                    point.v_inf, point.rpm, error
                );
            }
        }
    }
    if response.failed_count() > 0 {
        return Err(AppError::Solver(format!(
            "{} of {} operating points failed ({} did not converge)",
            response.failed_count(),
            response.points.len(),
            response.convergence_failure_count()
        )));
    }
    Ok(())
}

fn cmd_sweep(case_path: &Path, solver: Option<SolverKind>, output: Option<&Path>) -> AppResult<()> {
    let request = RunRequest {
        case_path,
        mode: RunMode::Sweep,
        options: RunOptions {
            solver,
            point: None,
        },
    };
    let response = run_with_progress(&request)?;

    match output {
        Some(path) => {
            rp_app::write_points_csv(path, &response.points)?;
            println!(
                "✓ Wrote {} points ({} failed) to {}",
                response.points.len(),
                response.failed_count(),
                path.display()
            );
        }
        None => print!("{}", rp_app::points_csv(&response.points)),
    }
    Ok(())
}

fn cmd_sensitivities(case_path: &Path, v_inf: f64, rpm: f64, step: f64) -> AppResult<()> {
    let case = rp_app::load_case(case_path)?;
    let compiled = rp_app::compile_case(&case)?;
    let report = rp_app::compute_sensitivities(&compiled, v_inf, rpm, step)?;

    let r = &report.record;
    println!(
        "Operating point: v_inf={} m/s, rpm={}  T={:.4} N  Q={:.4} N·m  P={:.3} W",
        r.v_inf, r.rpm, r.thrust, r.torque, r.power
    );
    println!();
    println!("{:<8} {:>14} {:>14} {:>14}", "", "d/dv_inf", "d/drpm", "d/dtwist[deg]");
    let s = &report.analytic;
    let rows: [(&str, &Gradient); 3] = [("T", &s.thrust), ("Q", &s.torque), ("P", &s.power)];
    for (i, (name, grad)) in rows.iter().enumerate() {
        let [a, b, c] = grad.operating_row();
        println!("{:<8} {:>14.6e} {:>14.6e} {:>14.6e}", name, a, b, c);
        if let Some(fd) = &report.finite_difference {
            println!(
                "{:<8} {:>14.6e} {:>14.6e} {:>14.6e}",
                "  (fd)",
                fd[(i, 0)],
                fd[(i, 1)],
                fd[(i, 2)]
            );
        }
    }
    match report.max_mismatch {
        Some(m) => println!("\nMax relative mismatch vs finite differences: {:.3e}", m),
        None => println!("\nFinite-difference check skipped at v_inf = 0"),
    }

    println!("\nPer-section thrust sensitivities:");
    println!("{:>4} {:>10} {:>14} {:>14}", "i", "r [m]", "dT/dpitch", "dT/dchord");
    for (i, section) in r.sections.iter().enumerate() {
        println!(
            "{:>4} {:>10.4} {:>14.6e} {:>14.6e}",
            i, section.radius, s.thrust.pitch_deg[i], s.thrust.chord[i]
        );
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (event.stage, event.point) {
        (RunStage::SolvingPoints | RunStage::Sweeping, Some(p)) => {
            let width = 28usize;
            let fraction = p.fraction_complete();
            let filled = ((fraction * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  {}  {}/{}  elapsed={:.1}s",
                bar,
                fraction * 100.0,
                event.stage.label(),
                p.completed,
                p.total,
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str("  ");
                line.push_str(msg);
            }
            print!("{line}");
        }
    }
    let _ = io::stdout().flush();
}
