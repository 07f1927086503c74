use crate::error::{OdeError, Result};
use crate::NumericVector;
use alga::general::RealField;

/// An initial-value problem `dy/dt = f(t, y)`, `y(t_0) = y_0`.
///
/// `evaluate` must be pure: steppers call it repeatedly on the same instance
/// with different trial states.
pub trait Problem {
  type S: RealField + From<f32>;

  fn name(&self) -> &str;

  /// Components per particle.
  fn dimension(&self) -> usize;

  fn particle_count(&self) -> usize {
    1
  }

  fn state_dimension(&self) -> usize {
    self.dimension() * self.particle_count()
  }

  fn initial_time(&self) -> Self::S;

  fn initial_state(&self) -> &NumericVector<Self::S>;

  fn evaluate(
    &self,
    t: Self::S,
    y: &NumericVector<Self::S>,
  ) -> Result<NumericVector<Self::S>>;

  fn validate(&self) -> Result<()> {
    let expected = self.state_dimension();
    let actual = self.initial_state().dimension();
    if expected == 0 {
      return Err(OdeError::InvalidConfiguration(format!(
        "{} has an empty state",
        self.name()
      )));
    }
    if expected != actual {
      return Err(OdeError::InvalidConfiguration(format!(
        "{} expects an initial state with {} components ({} per particle x \
         {} particles), got {}",
        self.name(),
        expected,
        self.dimension(),
        self.particle_count(),
        actual
      )));
    }

    Ok(())
  }
}
