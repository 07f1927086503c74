use crate::error::Result;
use crate::ode::{NullSettings, Problem, Stepper};
use crate::NumericVector;

pub type RK4Settings = NullSettings;

/// Classical fourth order Runge-Kutta.
///
/// ```text
/// k1 = f(t, y)
/// k2 = f(t + dt/2, y + dt/2 k1)
/// k3 = f(t + dt/2, y + dt/2 k2)
/// k4 = f(t + dt, y + dt k3)
/// y' = y + dt/6 (k1 + 2 k2 + 2 k3 + k4)
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RK4;

impl RK4 {
  pub fn new(_: RK4Settings) -> Self {
    Self
  }
}

impl Stepper for RK4 {
  fn name(&self) -> &'static str {
    "Runge Kutta 4"
  }

  fn advance<P: Problem>(
    &self,
    problem: &P,
    time: P::S,
    state: &NumericVector<P::S>,
    time_step: P::S,
  ) -> Result<NumericVector<P::S>> {
    let two: P::S = 2.0.into();
    let six: P::S = 6.0.into();
    let half_time_step = time_step / two;
    let sixth_time_step = time_step / six;
    let midpoint_time = time + half_time_step;

    // each stage evaluates at the trial state built from the previous one
    let k_1 = problem.evaluate(time, state)?;
    let k_2 = problem
      .evaluate(midpoint_time, &state.add(&k_1.scale(half_time_step))?)?;
    let k_3 = problem
      .evaluate(midpoint_time, &state.add(&k_2.scale(half_time_step))?)?;
    let k_4 =
      problem.evaluate(time + time_step, &state.add(&k_3.scale(time_step))?)?;

    let weighted = k_1
      .add(&k_2.scale(two))?
      .add(&k_3.scale(two))?
      .add(&k_4)?;

    state.add(&weighted.scale(sixth_time_step))
  }
}
