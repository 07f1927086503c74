use crate::error::Result;
use crate::ode::{
  Euler, EulerSettings, Midpoint, MidpointSettings, Problem, RK4Settings,
  Stepper, RK4,
};
use crate::NumericVector;
use clap::Subcommand;

#[cfg(test)]
use crate::problems::LinearProblem;

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum StepperType {
  Euler(EulerSettings),
  Midpoint(MidpointSettings),
  #[command(name = "rk4")]
  RK4(RK4Settings),
}

impl Default for StepperType {
  fn default() -> Self {
    StepperType::RK4(RK4Settings::default())
  }
}

#[derive(Clone, Copy, Debug)]
pub enum SwappableStepper {
  Euler(Euler),
  Midpoint(Midpoint),
  RK4(RK4),
}

impl SwappableStepper {
  pub fn new(t: StepperType) -> Self {
    match t {
      StepperType::Euler(settings) => Self::Euler(Euler::new(settings)),
      StepperType::Midpoint(settings) => {
        Self::Midpoint(Midpoint::new(settings))
      }
      StepperType::RK4(settings) => Self::RK4(RK4::new(settings)),
    }
  }
}

impl Stepper for SwappableStepper {
  fn name(&self) -> &'static str {
    match self {
      Self::Euler(method) => method.name(),
      Self::Midpoint(method) => method.name(),
      Self::RK4(method) => method.name(),
    }
  }

  fn advance<P: Problem>(
    &self,
    problem: &P,
    time: P::S,
    state: &NumericVector<P::S>,
    time_step: P::S,
  ) -> Result<NumericVector<P::S>> {
    match self {
      Self::Euler(method) => method.advance(problem, time, state, time_step),
      Self::Midpoint(method) => {
        method.advance(problem, time, state, time_step)
      }
      Self::RK4(method) => method.advance(problem, time, state, time_step),
    }
  }
}

#[test]
fn dispatches_to_selected_method() {
  let problem =
    LinearProblem::new(NumericVector::from_vec(vec![2.0]), 0.0, 0.6);

  for (stepper_type, direct) in [
    (
      StepperType::Euler(EulerSettings::default()),
      Euler.advance(&problem, 0.0, problem.initial_state(), 0.5),
    ),
    (
      StepperType::Midpoint(MidpointSettings::default()),
      Midpoint.advance(&problem, 0.0, problem.initial_state(), 0.5),
    ),
    (
      StepperType::RK4(RK4Settings::default()),
      RK4.advance(&problem, 0.0, problem.initial_state(), 0.5),
    ),
  ]
  .iter()
  {
    let stepper = SwappableStepper::new(stepper_type.clone());
    let swapped =
      stepper.advance(&problem, 0.0, problem.initial_state(), 0.5);

    assert_eq!(&swapped, direct);
  }
}

#[test]
fn names() {
  let rk4 = SwappableStepper::new(StepperType::default());
  let euler =
    SwappableStepper::new(StepperType::Euler(EulerSettings::default()));

  assert_eq!(rk4.name(), "Runge Kutta 4");
  assert_eq!(euler.name(), "Explicit Euler");
}
