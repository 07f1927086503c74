use crate::error::Result;
use crate::ode::{NullSettings, Problem, Stepper};
use crate::NumericVector;

pub type EulerSettings = NullSettings;

/// Explicit (forward) Euler: `y' = y + dt f(t, y)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Euler;

impl Euler {
  pub fn new(_: EulerSettings) -> Self {
    Self
  }
}

impl Stepper for Euler {
  fn name(&self) -> &'static str {
    "Explicit Euler"
  }

  fn advance<P: Problem>(
    &self,
    problem: &P,
    time: P::S,
    state: &NumericVector<P::S>,
    time_step: P::S,
  ) -> Result<NumericVector<P::S>> {
    let dxdt = problem.evaluate(time, state)?;

    state.add(&dxdt.scale(time_step))
  }
}
