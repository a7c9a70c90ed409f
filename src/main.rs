//! spline-front - command-line front-end for the external spline solver.
//!
//! Collects the interpolation inputs from the command line, hands them to
//! the solver through the `input.txt`/`output.txt` protocol and prints what
//! the solver wrote back.
//!
//! # Commands
//!
//! - `spline-front compute` - validate, run the solver, print its output
//! - `spline-front encode` - validate and write the request file only
//! - `spline-front inspect` - decode an existing request file

mod app;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spline_front::codec::{read_request_file, write_request_file};
use spline_front::config::SolverConfig;
use spline_front::models::RawRequest;
use spline_front::solver::ExternalSolver;

use app::App;

/// Front-end for the natural cubic spline solver
#[derive(Parser)]
#[command(name = "spline-front")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Solver executable (overrides $SPLINE_SOLVER_PATH)
    #[arg(long, global = true)]
    solver: Option<PathBuf>,

    /// Directory holding the solver's request and response files
    /// (overrides $SPLINE_WORK_DIR)
    #[arg(short, long, global = true)]
    work_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the inputs, run the solver and print its output
    Compute {
        #[command(flatten)]
        request: RequestArgs,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the inputs and write the request file without running the solver
    Encode {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// Decode a request file and print a summary
    Inspect {
        /// Request file (defaults to the configured request file)
        path: Option<PathBuf>,
    },
}

/// The five input fields, passed through unparsed so validation reports
/// protocol errors rather than argument errors.
#[derive(Args)]
struct RequestArgs {
    /// Arithmetic mode: 1 point, 2 interval, 3 double interval
    #[arg(short, long, default_value = "1", allow_hyphen_values = true)]
    mode: String,

    /// Number of interpolation nodes
    #[arg(short, long, allow_hyphen_values = true)]
    nodes: String,

    /// Whitespace-separated x values
    #[arg(short, long, allow_hyphen_values = true)]
    x: String,

    /// Whitespace-separated y values
    #[arg(short, long, allow_hyphen_values = true)]
    y: String,

    /// Whitespace-separated query point values
    #[arg(short, long, allow_hyphen_values = true)]
    query: String,
}

impl From<RequestArgs> for RawRequest {
    fn from(args: RequestArgs) -> Self {
        RawRequest::new(args.mode, args.nodes, args.x, args.y, args.query)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries solver output only
    let default_filter = if cli.verbose {
        "spline_front=debug"
    } else {
        "spline_front=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Compute { request, json } => compute(config, request.into(), json),
        Commands::Encode { request } => encode(&config, request.into()),
        Commands::Inspect { path } => inspect(&config, path),
    }
}

/// Defaults, then the config file, then the environment, then flags.
fn resolve_config(cli: &Cli) -> Result<SolverConfig> {
    let mut config = match &cli.config {
        Some(path) => SolverConfig::from_json_file(path)?,
        None => SolverConfig::default(),
    }
    .with_env();

    if let Some(solver) = &cli.solver {
        config.executable = solver.clone();
    }
    if let Some(work_dir) = &cli.work_dir {
        config.work_dir = work_dir.clone();
    }
    Ok(config)
}

fn compute(config: SolverConfig, request: RawRequest, json: bool) -> Result<ExitCode> {
    info!("Starting spline-front v{}", env!("CARGO_PKG_VERSION"));
    let app = App::new(ExternalSolver::new(config));
    let response = app.submit(&request);

    if json {
        println!("{}", response.render_json().context("Failed to encode JSON")?);
    } else if response.is_success() {
        println!("{}", response.render_text());
    } else {
        eprintln!("{}", response.render_text());
    }

    Ok(exit_code(response.exit_code()))
}

fn encode(config: &SolverConfig, request: RawRequest) -> Result<ExitCode> {
    let validated = request.validate()?;
    let path = config.request_path();
    write_request_file(&path, &validated)?;
    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn inspect(config: &SolverConfig, path: Option<PathBuf>) -> Result<ExitCode> {
    let path = path.unwrap_or_else(|| config.request_path());
    let request = read_request_file(&path)?;

    println!("file:        {}", path.display());
    println!(
        "mode:        {} ({})",
        request.mode(),
        request.mode().as_str()
    );
    println!("nodes:       {}", request.node_count());
    println!("x values:    {}", request.x_series().len());
    println!("y values:    {}", request.y_series().len());
    println!("query point: {:?}", request.query_point());
    Ok(ExitCode::SUCCESS)
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}
