//! spline-front library
//!
//! The request/response protocol between a front-end and the external
//! natural cubic spline solver:
//!
//! - `models` - request, result and mode types
//! - `request` - validation of the raw input strings
//! - `codec` - the line-oriented request file format
//! - `solver` - running the solver and reading its response
//! - `config` - executable, working directory and file names
//! - `error` - the error taxonomy
//!
//! # Usage
//!
//! ```no_run
//! use spline_front::config::SolverConfig;
//! use spline_front::models::RawRequest;
//! use spline_front::solver::{ExternalSolver, SolverService};
//!
//! let solver = ExternalSolver::new(SolverConfig::default());
//! let request = RawRequest::new("1", "3", "1 2 3", "2 3 5", "2.5");
//! let result = solver.compute(&request)?;
//! println!("{result}");
//! # Ok::<(), spline_front::error::Error>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod request;
pub mod solver;

pub use error::{Error, ErrorKind};
pub use models::{InterpolationRequest, Mode, RawRequest, SolverResult};
pub use solver::{ExternalSolver, SolverService};
