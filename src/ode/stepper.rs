use crate::error::Result;
use crate::ode::Problem;
use crate::NumericVector;

/// One fixed-size explicit time advance.
///
/// Implementations hold no state between calls, so a single stepper can be
/// shared by any number of solvers.
pub trait Stepper {
  fn name(&self) -> &'static str;

  fn advance<P: Problem>(
    &self,
    problem: &P,
    time: P::S,
    state: &NumericVector<P::S>,
    time_step: P::S,
  ) -> Result<NumericVector<P::S>>;
}
