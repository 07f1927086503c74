pub mod euler;
pub mod midpoint;
pub mod null_settings;
pub mod problem;
pub mod rk4;
pub mod solver;
pub mod stepper;
pub mod swappable_stepper;

pub use euler::{Euler, EulerSettings};
pub use midpoint::{Midpoint, MidpointSettings};
pub use null_settings::NullSettings;
pub use problem::Problem;
pub use rk4::{RK4Settings, RK4};
pub use solver::{Solver, SolverConfig};
pub use stepper::Stepper;
pub use swappable_stepper::{StepperType, SwappableStepper};
