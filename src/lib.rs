pub mod error;
pub mod ode;
pub mod problems;
pub mod sweep;
pub mod utils;
pub mod vector;

pub use error::{OdeError, Result};
pub use ode::{Problem, Solver, SolverConfig, Stepper};
pub use problems::{Body, LinearProblem, NBodyProblem};
pub use sweep::solve_all;
pub use vector::NumericVector;
