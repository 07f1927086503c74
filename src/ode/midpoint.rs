use crate::error::Result;
use crate::ode::{NullSettings, Problem, Stepper};
use crate::NumericVector;

pub type MidpointSettings = NullSettings;

/// Explicit midpoint rule, second order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Midpoint;

impl Midpoint {
  pub fn new(_: MidpointSettings) -> Self {
    Self
  }
}

impl Stepper for Midpoint {
  fn name(&self) -> &'static str {
    "Midpoint"
  }

  fn advance<P: Problem>(
    &self,
    problem: &P,
    time: P::S,
    state: &NumericVector<P::S>,
    time_step: P::S,
  ) -> Result<NumericVector<P::S>> {
    let half_time_step = time_step * 0.5.into();

    let dxdt = problem.evaluate(time, state)?;
    let midpoint_state = state.add(&dxdt.scale(half_time_step))?;
    let midpoint_time = time + half_time_step;

    let dxdt = problem.evaluate(midpoint_time, &midpoint_state)?;

    state.add(&dxdt.scale(time_step))
  }
}
